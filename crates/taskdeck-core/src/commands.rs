use std::io::{self, Read, Write};

use anyhow::{Context, anyhow};
use tracing::{debug, info, instrument};

use crate::board::Board;
use crate::cli::{BoardArgs, Command, FormArgs};
use crate::config::Config;
use crate::datastore::DataStore;
use crate::form::{self, ModalEvent, ModalState, Submission, TaskForm};
use crate::render::{Renderer, sanitize};
use crate::task::{Priority, Task, TaskFields};
use crate::view::{Controls, build_view};

#[instrument(skip(store, cfg, renderer, command))]
pub fn dispatch(
    store: &DataStore,
    cfg: &Config,
    renderer: &mut Renderer,
    command: Option<Command>,
) -> anyhow::Result<()> {
    let command = command.unwrap_or_else(|| Command::Board(BoardArgs::default()));
    debug!(?command, "dispatching command");

    match command {
        Command::Board(args) => cmd_board(store, cfg, renderer, &args),
        Command::Add(args) => cmd_add(store, cfg, renderer, &args),
        Command::Edit { id, form } => cmd_edit(store, cfg, renderer, &id, &form),
        Command::Delete { id, yes } => cmd_delete(store, cfg, renderer, &id, yes),
        Command::Show { id } => cmd_show(store, renderer, &id),
        Command::Subjects => cmd_subjects(store),
        Command::Export => cmd_export(store),
        Command::Import => cmd_import(store),
        Command::Demo => cmd_demo(store, cfg, renderer),
    }
}

#[instrument(skip(store, cfg, renderer, args))]
fn cmd_board(
    store: &DataStore,
    cfg: &Config,
    renderer: &mut Renderer,
    args: &BoardArgs,
) -> anyhow::Result<()> {
    info!("command board");
    let tasks = store.load()?;
    let controls = controls_from_args(cfg, args)?;
    let view = build_view(&tasks, &controls);
    renderer.print_board(&view)
}

#[instrument(skip(store, cfg, renderer, args))]
fn cmd_add(
    store: &DataStore,
    cfg: &Config,
    renderer: &mut Renderer,
    args: &FormArgs,
) -> anyhow::Result<()> {
    info!("command add");
    let mut board = Board::new(store.load()?);

    let mut modal = ModalState::default().apply(ModalEvent::AddClicked);
    let Some(form) = form_session(modal, &board, args)? else {
        modal = modal.apply(ModalEvent::CloseClicked);
        debug!(?modal, "form closed without commit");
        println!("Cancelled.");
        return Ok(());
    };

    commit(store, &mut board, &mut modal, &form)?;
    cmd_board(store, cfg, renderer, &BoardArgs::default())
}

#[instrument(skip(store, cfg, renderer, args))]
fn cmd_edit(
    store: &DataStore,
    cfg: &Config,
    renderer: &mut Renderer,
    id_token: &str,
    args: &FormArgs,
) -> anyhow::Result<()> {
    info!("command edit");
    let mut board = Board::new(store.load()?);
    let id = board.resolve_id(id_token)?;

    let mut modal = ModalState::default().apply(ModalEvent::EditClicked(id));
    let Some(form) = form_session(modal, &board, args)? else {
        modal = modal.apply(ModalEvent::CloseClicked);
        debug!(?modal, "form closed without commit");
        println!("Cancelled.");
        return Ok(());
    };

    commit(store, &mut board, &mut modal, &form)?;
    cmd_board(store, cfg, renderer, &BoardArgs::default())
}

#[instrument(skip(store, cfg, renderer))]
fn cmd_delete(
    store: &DataStore,
    cfg: &Config,
    renderer: &mut Renderer,
    id_token: &str,
    yes: bool,
) -> anyhow::Result<()> {
    info!("command delete");
    let mut board = Board::new(store.load()?);
    let id = board.resolve_id(id_token)?;
    let title = board
        .get(id)
        .map(|task| task.title.clone())
        .unwrap_or_default();

    if !yes && !confirm(&format!("Delete task '{}'?", sanitize(&title)))? {
        println!("Not deleting.");
        return Ok(());
    }

    board.delete(id)?;
    store.save(board.tasks())?;
    println!("Deleted task {}.", short(id));
    cmd_board(store, cfg, renderer, &BoardArgs::default())
}

#[instrument(skip(store, renderer))]
fn cmd_show(store: &DataStore, renderer: &mut Renderer, id_token: &str) -> anyhow::Result<()> {
    info!("command show");
    let board = Board::new(store.load()?);
    let id = board.resolve_id(id_token)?;
    let task = board
        .get(id)
        .ok_or_else(|| anyhow!("no task with id {id}"))?;
    renderer.print_task(task)
}

#[instrument(skip(store))]
fn cmd_subjects(store: &DataStore) -> anyhow::Result<()> {
    info!("command subjects");
    let board = Board::new(store.load()?);
    for subject in board.subjects() {
        println!("{}", sanitize(&subject));
    }
    Ok(())
}

#[instrument(skip(store))]
fn cmd_export(store: &DataStore) -> anyhow::Result<()> {
    info!("command export");
    let tasks = store.load()?;
    let payload = serde_json::to_string_pretty(&tasks)?;
    println!("{payload}");
    Ok(())
}

#[instrument(skip(store))]
fn cmd_import(store: &DataStore) -> anyhow::Result<()> {
    info!("command import");

    let mut stdin = String::new();
    io::stdin()
        .read_to_string(&mut stdin)
        .context("failed reading stdin")?;

    let trimmed = stdin.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("import: empty input"));
    }

    let incoming: Vec<Task> =
        serde_json::from_str(trimmed).context("import: input is not a task array")?;

    let mut board = Board::new(store.load()?);
    let mut replaced = 0usize;
    let mut added = 0usize;
    for task in incoming {
        if board.get(task.id).is_some() {
            board.update(task.id, task.fields())?;
            replaced += 1;
        } else {
            board.insert(task)?;
            added += 1;
        }
    }

    store.save(board.tasks())?;
    println!("Imported {added} new and {replaced} updated tasks.");
    Ok(())
}

#[instrument(skip(store, cfg, renderer))]
fn cmd_demo(store: &DataStore, cfg: &Config, renderer: &mut Renderer) -> anyhow::Result<()> {
    info!("command demo");
    let mut board = Board::new(store.load()?);
    if !board.is_empty() {
        println!("Board is not empty; leaving it as is.");
        return Ok(());
    }

    for fields in sample_fields() {
        board.create(fields);
    }
    store.save(board.tasks())?;
    cmd_board(store, cfg, renderer, &BoardArgs::default())
}

fn sample_fields() -> Vec<TaskFields> {
    vec![
        TaskFields {
            title: "Prepare final presentation".to_string(),
            description: "Collect every deliverable and rehearse the ten minute talk".to_string(),
            due_date: "25/12/2025".to_string(),
            subject: "Development".to_string(),
            priority: "High".to_string(),
            status: "In Progress".to_string(),
        },
        TaskFields {
            title: "Review responsive layout".to_string(),
            description: "Make sure the design works on phones and tablets".to_string(),
            due_date: "15/12/2025".to_string(),
            subject: "UX Design".to_string(),
            priority: "Low".to_string(),
            status: "Completed Task".to_string(),
        },
        TaskFields {
            title: "Buy project materials".to_string(),
            description: "Poster board and markers for the history project".to_string(),
            due_date: "01/12/2025".to_string(),
            subject: "Others".to_string(),
            priority: "Medium".to_string(),
            status: "Over-Due".to_string(),
        },
    ]
}

/// Translate the board flags plus config defaults into control state.
fn controls_from_args(cfg: &Config, args: &BoardArgs) -> anyhow::Result<Controls> {
    let sort_key = args
        .sort
        .clone()
        .or_else(|| cfg.get("sort.key"))
        .unwrap_or_else(|| "due".to_string())
        .parse()?;

    let direction = args
        .direction
        .clone()
        .or_else(|| cfg.get("sort.direction"))
        .unwrap_or_else(|| "asc".to_string())
        .parse()?;

    let tab = args
        .tab
        .clone()
        .or_else(|| cfg.get("tab"))
        .unwrap_or_else(|| "In Progress".to_string())
        .parse()?;

    let priority = match args.priority.as_deref() {
        None | Some("") => None,
        Some(text) => Some(text.parse::<Priority>()?),
    };

    Ok(Controls {
        search: args.search.clone().unwrap_or_default(),
        subject: args.subject.clone().filter(|subject| !subject.is_empty()),
        priority,
        sort_key,
        direction,
        tab,
    })
}

/// Run one pass of the form for whatever the modal is open on. `None`
/// means the session ended without a commit (stdin closed).
fn form_session(
    modal: ModalState,
    board: &Board,
    args: &FormArgs,
) -> anyhow::Result<Option<TaskForm>> {
    let base = match modal {
        ModalState::Closed => return Ok(None),
        ModalState::OpenForCreate => TaskForm::blank(),
        ModalState::OpenForEdit(id) => {
            let task = board
                .get(id)
                .ok_or_else(|| anyhow!("no task with id {id}"))?;
            TaskForm::prefill(task)
        }
    };
    fill_form(base, args)
}

fn fill_form(mut form: TaskForm, args: &FormArgs) -> anyhow::Result<Option<TaskForm>> {
    macro_rules! field {
        ($arg:expr, $slot:expr, $label:literal) => {
            if let Some(value) = &$arg {
                $slot = value.clone();
            } else {
                match prompt_field($label, &$slot)? {
                    Some(value) => $slot = value,
                    None => return Ok(None),
                }
            }
        };
    }

    field!(args.title, form.title, "Title");
    field!(args.description, form.description, "Description");
    field!(args.due, form.due_control, "Due (YYYY-MM-DD)");
    field!(args.subject, form.subject, "Subject");
    field!(args.priority, form.priority, "Priority (Low/Medium/High)");
    field!(args.status, form.status, "Status");

    Ok(Some(form))
}

/// Print a prompt and read one line. Enter keeps the current value;
/// `None` on closed stdin.
fn prompt_field(label: &str, current: &str) -> anyhow::Result<Option<String>> {
    {
        let mut out = io::stdout().lock();
        if current.is_empty() {
            write!(out, "{label}: ")?;
        } else {
            write!(out, "{label} [{current}]: ")?;
        }
        out.flush()?;
    }

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("failed reading stdin")?;
    if read == 0 {
        return Ok(None);
    }

    let trimmed = input.trim();
    Ok(Some(if trimmed.is_empty() {
        current.to_string()
    } else {
        trimmed.to_string()
    }))
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    match prompt_field(&format!("{question} [y/N]"), "")? {
        Some(answer) => Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")),
        None => Ok(false),
    }
}

fn commit(
    store: &DataStore,
    board: &mut Board,
    modal: &mut ModalState,
    form: &TaskForm,
) -> anyhow::Result<()> {
    match form::submit(form)? {
        Submission::Create(fields) => {
            let id = board.create(fields);
            store.save(board.tasks())?;
            println!("Created task {}.", short(id));
        }
        Submission::Update(id, fields) => {
            board.update(id, fields)?;
            store.save(board.tasks())?;
            println!("Updated task {}.", short(id));
        }
    }

    *modal = modal.apply(ModalEvent::Submitted);
    debug!(?modal, "form committed");
    Ok(())
}

fn short(id: uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}
