//! The create/edit form and the modal state machine behind it.
//!
//! The machine is plain data so the interactive session in the command
//! layer can drive it, and so it tests without any terminal attached.

use anyhow::anyhow;
use uuid::Uuid;

use crate::date;
use crate::task::{Priority, Status, Task, TaskFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    OpenForCreate,
    OpenForEdit(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    AddClicked,
    EditClicked(Uuid),
    CardClicked(Uuid),
    /// Form committed; the view is refreshed by the caller.
    Submitted,
    CloseClicked,
    BackdropClicked,
}

impl ModalState {
    pub fn apply(self, event: ModalEvent) -> ModalState {
        match event {
            ModalEvent::AddClicked => ModalState::OpenForCreate,
            ModalEvent::EditClicked(id) | ModalEvent::CardClicked(id) => {
                ModalState::OpenForEdit(id)
            }
            ModalEvent::Submitted | ModalEvent::CloseClicked | ModalEvent::BackdropClicked => {
                ModalState::Closed
            }
        }
    }

    pub fn is_open(self) -> bool {
        self != ModalState::Closed
    }
}

/// Raw form values as typed into the controls. The due date is in the
/// control's YYYY-MM-DD form; `id` is the hidden field that routes a
/// submit to update instead of create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub due_control: String,
    pub subject: String,
    pub priority: String,
    pub status: String,
}

impl TaskForm {
    /// A cleared form, selects on their defaults.
    pub fn blank() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            due_control: String::new(),
            subject: "Others".to_string(),
            priority: "Medium".to_string(),
            status: Status::InProgress.as_str().to_string(),
        }
    }

    /// Prefill from an existing record for the edit flow. A stored due
    /// date the converter cannot read leaves the control empty, so the
    /// user has to re-enter a valid one.
    pub fn prefill(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            due_control: date::display_to_control(&task.due_date).unwrap_or_default(),
            subject: task.subject.clone(),
            priority: task.priority.clone(),
            status: task.status.clone(),
        }
    }

    /// Validate the form into storable fields. This is where malformed
    /// dates and out-of-set selections are rejected.
    pub fn validate(&self) -> anyhow::Result<TaskFields> {
        if self.title.trim().is_empty() {
            return Err(anyhow!("title must not be empty"));
        }

        let due_date = date::control_to_display(&self.due_control)?;
        let priority: Priority = self.priority.parse()?;
        let status: Status = self.status.parse()?;

        Ok(TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date,
            subject: self.subject.clone(),
            priority: priority.as_str().to_string(),
            status: status.as_str().to_string(),
        })
    }
}

/// Where a submitted form is routed: id present means update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(TaskFields),
    Update(Uuid, TaskFields),
}

pub fn submit(form: &TaskForm) -> anyhow::Result<Submission> {
    let fields = form.validate()?;
    Ok(match form.id {
        Some(id) => Submission::Update(id, fields),
        None => Submission::Create(fields),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> TaskForm {
        TaskForm {
            id: None,
            title: "Prepare talk".to_string(),
            description: "Ten minutes".to_string(),
            due_control: "2025-12-25".to_string(),
            subject: "Development".to_string(),
            priority: "High".to_string(),
            status: "In Progress".to_string(),
        }
    }

    #[test]
    fn modal_transitions_match_the_reference() {
        let state = ModalState::default();
        assert_eq!(state, ModalState::Closed);

        let open = state.apply(ModalEvent::AddClicked);
        assert_eq!(open, ModalState::OpenForCreate);
        assert!(open.is_open());
        assert_eq!(open.apply(ModalEvent::Submitted), ModalState::Closed);

        let id = Uuid::new_v4();
        assert_eq!(
            state.apply(ModalEvent::EditClicked(id)),
            ModalState::OpenForEdit(id)
        );
        assert_eq!(
            state.apply(ModalEvent::CardClicked(id)),
            ModalState::OpenForEdit(id)
        );
        assert_eq!(
            ModalState::OpenForEdit(id).apply(ModalEvent::CloseClicked),
            ModalState::Closed
        );
        assert_eq!(
            ModalState::OpenForCreate.apply(ModalEvent::BackdropClicked),
            ModalState::Closed
        );
    }

    #[test]
    fn submit_routes_by_hidden_id() {
        let form = filled_form();
        match submit(&form).expect("valid form") {
            Submission::Create(fields) => assert_eq!(fields.due_date, "25/12/2025"),
            Submission::Update(..) => panic!("blank id must route to create"),
        }

        let id = Uuid::new_v4();
        let form = TaskForm {
            id: Some(id),
            ..filled_form()
        };
        match submit(&form).expect("valid form") {
            Submission::Update(got, fields) => {
                assert_eq!(got, id);
                assert_eq!(fields.status, "In Progress");
            }
            Submission::Create(_) => panic!("id must route to update"),
        }
    }

    #[test]
    fn validation_rejects_bad_input_at_the_boundary() {
        let form = TaskForm {
            title: "   ".to_string(),
            ..filled_form()
        };
        assert!(form.validate().is_err());

        let form = TaskForm {
            due_control: "2026-02-31".to_string(),
            ..filled_form()
        };
        assert!(form.validate().is_err());

        let form = TaskForm {
            priority: "Critical".to_string(),
            ..filled_form()
        };
        assert!(form.validate().is_err());

        let form = TaskForm {
            status: "Paused".to_string(),
            ..filled_form()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn validation_normalizes_selection_case() {
        let form = TaskForm {
            priority: "high".to_string(),
            status: "over-due".to_string(),
            ..filled_form()
        };
        let fields = form.validate().expect("valid");
        assert_eq!(fields.priority, "High");
        assert_eq!(fields.status, "Over-Due");
    }

    #[test]
    fn prefill_carries_the_record_into_control_format() {
        let task = Task::new(TaskFields {
            title: "Review".to_string(),
            description: String::new(),
            due_date: "15/12/25".to_string(),
            subject: "UX Design".to_string(),
            priority: "Low".to_string(),
            status: "Completed Task".to_string(),
        });

        let form = TaskForm::prefill(&task);
        assert_eq!(form.id, Some(task.id));
        assert_eq!(form.due_control, "2025-12-15");

        let broken = Task::new(TaskFields {
            due_date: "whenever".to_string(),
            ..task.fields()
        });
        assert_eq!(TaskForm::prefill(&broken).due_control, "");
    }
}
