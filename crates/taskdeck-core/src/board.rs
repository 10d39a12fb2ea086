use std::collections::BTreeSet;

use anyhow::anyhow;
use tracing::debug;
use uuid::Uuid;

use crate::task::{Task, TaskFields};

/// The in-memory task store. Owns the canonical ordered list; the view
/// pipeline only ever sees a cloned projection. Persistence is the
/// caller's job: mutate, then hand `tasks()` to the datastore.
#[derive(Debug, Default)]
pub struct Board {
    tasks: Vec<Task>,
}

impl Board {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Append a new record with a freshly assigned id.
    #[tracing::instrument(skip(self, fields))]
    pub fn create(&mut self, fields: TaskFields) -> Uuid {
        let task = Task::new(fields);
        let id = task.id;
        debug!(%id, title = %task.title, "created task");
        self.tasks.push(task);
        id
    }

    /// Replace every field of the record with this id, keeping the id.
    /// An unknown id is an error, not a silent no-op.
    #[tracing::instrument(skip(self, fields))]
    pub fn update(&mut self, id: Uuid, fields: TaskFields) -> anyhow::Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| anyhow!("no task with id {id}"))?;
        task.apply(fields);
        debug!(%id, "updated task");
        Ok(())
    }

    /// Remove and return the record with this id.
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: Uuid) -> anyhow::Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| anyhow!("no task with id {id}"))?;
        let task = self.tasks.remove(idx);
        debug!(%id, title = %task.title, "deleted task");
        Ok(task)
    }

    /// Append a record that already has an id (import path). The id
    /// uniqueness invariant still holds: a duplicate is an error.
    pub fn insert(&mut self, task: Task) -> anyhow::Result<()> {
        if self.get(task.id).is_some() {
            return Err(anyhow!("duplicate task id {}", task.id));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Distinct subjects in sorted order, for the subject filter.
    pub fn subjects(&self) -> Vec<String> {
        self.tasks
            .iter()
            .map(|task| task.subject.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Resolve a full id or a unique id prefix typed on the command
    /// line into a task id.
    pub fn resolve_id(&self, token: &str) -> anyhow::Result<Uuid> {
        if let Ok(id) = Uuid::parse_str(token) {
            if self.get(id).is_some() {
                return Ok(id);
            }
            return Err(anyhow!("no task with id {id}"));
        }

        if token.is_empty() {
            return Err(anyhow!("empty task id"));
        }

        let needle = token.to_ascii_lowercase();
        let matches: Vec<Uuid> = self
            .tasks
            .iter()
            .filter(|task| task.id.to_string().starts_with(&needle))
            .map(|task| task.id)
            .collect();

        match matches.as_slice() {
            [] => Err(anyhow!("no task with id {token}")),
            [id] => Ok(*id),
            _ => Err(anyhow!("ambiguous task id prefix: {token}")),
        }
    }
}
