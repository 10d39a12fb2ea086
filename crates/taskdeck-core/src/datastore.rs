use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::task::Task;

/// The persisted board: one JSON array of task records in `board.json`
/// under the data directory. Every mutation rewrites the whole file.
#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub board_path: PathBuf,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let board_path = data_dir.join("board.json");

        info!(
            data_dir = %data_dir.display(),
            board = %board_path.display(),
            "opened datastore"
        );

        Ok(Self {
            data_dir,
            board_path,
        })
    }

    /// Load the full task list. A missing file means an empty board;
    /// a file that does not parse also yields an empty board, with a
    /// warning, rather than an error. Other I/O failures propagate.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> anyhow::Result<Vec<Task>> {
        if !self.board_path.exists() {
            debug!(file = %self.board_path.display(), "board file absent; starting empty");
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.board_path)
            .with_context(|| format!("failed reading {}", self.board_path.display()))?;

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => {
                debug!(count = tasks.len(), "loaded tasks from board file");
                Ok(tasks)
            }
            Err(err) => {
                warn!(
                    file = %self.board_path.display(),
                    error = %err,
                    "malformed board file; starting with an empty board"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Persist the full task list, atomically: serialize into a temp
    /// file in the same directory, then rename it over the target.
    #[tracing::instrument(skip(self, tasks))]
    pub fn save(&self, tasks: &[Task]) -> anyhow::Result<()> {
        debug!(
            file = %self.board_path.display(),
            count = tasks.len(),
            "saving board atomically"
        );

        let dir = self.board_path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut temp, tasks)?;
        writeln!(temp)?;
        temp.flush()?;

        temp.persist(&self.board_path)
            .map_err(|err| anyhow!("failed to persist {}: {}", self.board_path.display(), err))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::DataStore;
    use crate::task::{Task, TaskFields};

    fn sample_fields() -> TaskFields {
        TaskFields {
            title: "Review layout".to_string(),
            description: "Phones and tablets".to_string(),
            due_date: "15/12/2025".to_string(),
            subject: "UX Design".to_string(),
            priority: "Low".to_string(),
            status: "Completed Task".to_string(),
        }
    }

    #[test]
    fn missing_file_loads_as_empty_board() {
        let temp = tempdir().expect("tempdir");
        let store = DataStore::open(temp.path()).expect("open");
        assert!(store.load().expect("load").is_empty());
    }

    #[test]
    fn save_then_load_roundtrips_fields() {
        let temp = tempdir().expect("tempdir");
        let store = DataStore::open(temp.path()).expect("open");

        let task = Task::new(sample_fields());
        store.save(std::slice::from_ref(&task)).expect("save");

        let loaded = store.load().expect("load");
        assert_eq!(loaded, vec![task]);
    }

    #[test]
    fn malformed_board_file_fails_closed() {
        let temp = tempdir().expect("tempdir");
        let store = DataStore::open(temp.path()).expect("open");

        std::fs::write(&store.board_path, "{ this is not json").expect("write");
        assert!(store.load().expect("load").is_empty());
    }
}
