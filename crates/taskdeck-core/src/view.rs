//! The view pipeline: a pure function from (task list, control state)
//! to the render model. Sort the whole collection, filter by search
//! text, filter by the two value selections, then partition what is
//! left into the three status columns. Nothing here mutates the store.

use std::cmp::Ordering;

use tracing::debug;

use crate::date;
use crate::task::{Priority, Status, Task, priority_ordinal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Priority,
    #[default]
    DueDate,
    Title,
}

impl std::str::FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "priority" => Ok(SortKey::Priority),
            "due" | "duedate" | "date" => Ok(SortKey::DueDate),
            "title" => Ok(SortKey::Title),
            other => Err(anyhow::anyhow!(
                "invalid sort key: {other} (expected priority, due or title)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(anyhow::anyhow!(
                "invalid sort direction: {other} (expected asc or desc)"
            )),
        }
    }
}

/// Current values of the UI controls that parameterize the pipeline.
#[derive(Debug, Clone)]
pub struct Controls {
    pub search: String,
    pub subject: Option<String>,
    pub priority: Option<Priority>,
    pub sort_key: SortKey,
    pub direction: SortDirection,
    /// Focused column. Presentation only: membership and counts are
    /// the same whichever tab is active.
    pub tab: Status,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            search: String::new(),
            subject: None,
            priority: None,
            sort_key: SortKey::default(),
            direction: SortDirection::default(),
            tab: Status::InProgress,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub status: Status,
    pub tasks: Vec<Task>,
    /// Count over the filtered set, not the whole store.
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct BoardView {
    pub columns: Vec<Column>,
    pub active: Status,
}

impl BoardView {
    pub fn column(&self, status: Status) -> Option<&Column> {
        self.columns.iter().find(|column| column.status == status)
    }
}

/// Derive the render model. Stable sort first so ties keep their
/// stored relative order, then the filters, then the partition in
/// post-sort order.
pub fn build_view(tasks: &[Task], controls: &Controls) -> BoardView {
    let mut sorted: Vec<Task> = tasks.to_vec();
    sorted.sort_by(|a, b| {
        let ord = compare(a, b, controls.sort_key);
        match controls.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    let needle = controls.search.to_lowercase();
    let filtered: Vec<Task> = sorted
        .into_iter()
        .filter(|task| matches_search(task, &needle))
        .filter(|task| {
            controls
                .subject
                .as_deref()
                .is_none_or(|subject| task.subject == subject)
        })
        .filter(|task| {
            controls
                .priority
                .is_none_or(|priority| task.priority == priority.as_str())
        })
        .collect();

    let mut columns: Vec<Column> = Status::ALL
        .into_iter()
        .map(|status| Column {
            status,
            tasks: Vec::new(),
            count: 0,
        })
        .collect();

    for task in filtered {
        match task.status_column() {
            Some(status) => {
                if let Some(column) = columns.iter_mut().find(|column| column.status == status) {
                    column.tasks.push(task);
                    column.count += 1;
                }
            }
            None => {
                debug!(id = %task.id, status = %task.status, "status names no column; dropped from view");
            }
        }
    }

    BoardView {
        columns,
        active: controls.tab,
    }
}

fn compare(a: &Task, b: &Task, key: SortKey) -> Ordering {
    match key {
        SortKey::Priority => priority_ordinal(&a.priority).cmp(&priority_ordinal(&b.priority)),
        SortKey::DueDate => date::sort_token(&a.due_date).cmp(&date::sort_token(&b.due_date)),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

fn matches_search(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
        || task.subject.to_lowercase().contains(needle)
}
