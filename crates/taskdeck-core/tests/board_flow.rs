use std::fs;

use taskdeck_core::board::Board;
use taskdeck_core::datastore::DataStore;
use taskdeck_core::task::{Status, TaskFields};
use taskdeck_core::view::{Controls, build_view};
use tempfile::tempdir;
use uuid::Uuid;

fn fields(title: &str, status: &str) -> TaskFields {
    TaskFields {
        title: title.to_string(),
        description: "integration fixture".to_string(),
        due_date: "25/12/2025".to_string(),
        subject: "Development".to_string(),
        priority: "High".to_string(),
        status: status.to_string(),
    }
}

#[test]
fn create_then_reload_yields_identical_fields_and_fresh_id() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let mut board = Board::new(store.load().expect("load empty"));
    let id = board.create(fields("Prepare talk", "In Progress"));
    store.save(board.tasks()).expect("save");

    let reloaded = store.load().expect("reload");
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].id, id);
    assert_eq!(reloaded[0].fields(), fields("Prepare talk", "In Progress"));

    let other = Board::new(reloaded).create(fields("Second", "In Progress"));
    assert_ne!(other, id, "ids must be unique across creations");
}

#[test]
fn update_replaces_fields_wholesale_and_keeps_id() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let mut board = Board::new(Vec::new());
    let id = board.create(fields("Before", "In Progress"));
    store.save(board.tasks()).expect("save");

    let mut board = Board::new(store.load().expect("load"));
    board
        .update(id, fields("After", "Completed Task"))
        .expect("update");
    store.save(board.tasks()).expect("save");

    let reloaded = store.load().expect("reload");
    assert_eq!(reloaded[0].id, id);
    assert_eq!(reloaded[0].title, "After");
    assert_eq!(reloaded[0].status, "Completed Task");
}

#[test]
fn deleting_a_missing_id_changes_nothing_in_memory_or_on_disk() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let mut board = Board::new(Vec::new());
    board.create(fields("Keep me", "In Progress"));
    store.save(board.tasks()).expect("save");
    let on_disk_before = fs::read_to_string(&store.board_path).expect("read");

    let err = board.delete(Uuid::new_v4()).expect_err("missing id");
    assert!(err.to_string().contains("no task with id"));

    assert_eq!(board.len(), 1);
    let on_disk_after = fs::read_to_string(&store.board_path).expect("read");
    assert_eq!(on_disk_before, on_disk_after);
}

#[test]
fn corrupt_board_file_loads_as_empty_and_can_be_rebuilt() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    fs::write(&store.board_path, "[{\"id\": \"not-a-uuid\"").expect("corrupt");
    let tasks = store.load().expect("load must not fail");
    assert!(tasks.is_empty());

    let mut board = Board::new(tasks);
    board.create(fields("Fresh start", "In Progress"));
    store.save(board.tasks()).expect("save over corrupt file");
    assert_eq!(store.load().expect("reload").len(), 1);
}

#[test]
fn persisted_board_feeds_the_view_pipeline() {
    let temp = tempdir().expect("tempdir");
    let store = DataStore::open(temp.path()).expect("open datastore");

    let mut board = Board::new(Vec::new());
    board.create(fields("A", "In Progress"));
    board.create(fields("B", "Over-Due"));
    store.save(board.tasks()).expect("save");

    let tasks = store.load().expect("reload");
    let view = build_view(&tasks, &Controls::default());
    assert_eq!(view.column(Status::InProgress).expect("col").count, 1);
    assert_eq!(view.column(Status::OverDue).expect("col").count, 1);
    assert_eq!(view.column(Status::Completed).expect("col").count, 0);
}
