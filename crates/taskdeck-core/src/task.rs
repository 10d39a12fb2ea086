use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow stage. Doubles as the column a task renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Completed,
    OverDue,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::InProgress, Status::Completed, Status::OverDue];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::InProgress => "In Progress",
            Status::Completed => "Completed Task",
            Status::OverDue => "Over-Due",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "in progress" | "in-progress" | "progress" => Ok(Status::InProgress),
            "completed task" | "completed" | "done" => Ok(Status::Completed),
            "over-due" | "overdue" => Ok(Status::OverDue),
            other => Err(anyhow::anyhow!(
                "invalid status: {other} (expected one of: In Progress, Completed Task, Over-Due)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(anyhow::anyhow!(
                "invalid priority: {other} (expected Low, Medium or High)"
            )),
        }
    }
}

/// Sort rank for a stored priority string. Unrecognized values rank
/// below Low so they sink to one end of the ordering.
pub fn priority_ordinal(priority: &str) -> u8 {
    match priority {
        "High" => 3,
        "Medium" => 2,
        "Low" => 1,
        _ => 0,
    }
}

/// A task record as persisted in the board file.
///
/// `priority` and `status` stay string-typed: the persisted data may
/// carry values outside the known sets, and those records must still
/// load, sort (rank 0) and survive a save untouched. The typed enums
/// above are enforced only at the form boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Calendar date in DD/MM/YYYY display form.
    pub due_date: String,
    pub subject: String,
    pub priority: String,
    pub status: String,
}

/// Everything a task carries except its identity. `update` swaps the
/// whole set at once; the id is assigned at creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub subject: String,
    pub priority: String,
    pub status: String,
}

impl Task {
    pub fn new(fields: TaskFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            subject: fields.subject,
            priority: fields.priority,
            status: fields.status,
        }
    }

    /// Replace every field except the id.
    pub fn apply(&mut self, fields: TaskFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.due_date = fields.due_date;
        self.subject = fields.subject;
        self.priority = fields.priority;
        self.status = fields.status;
    }

    /// The column this task belongs to, if its status names one.
    pub fn status_column(&self) -> Option<Status> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == self.status)
    }

    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date.clone(),
            subject: self.subject.clone(),
            priority: self.priority.clone(),
            status: self.status.clone(),
        }
    }
}
