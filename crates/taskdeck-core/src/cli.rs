use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: a column-based task tracker",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the status columns (the default).
    Board(BoardArgs),
    /// Create a task; missing fields are prompted for.
    Add(FormArgs),
    /// Edit an existing task (full id or unique prefix).
    Edit {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete a task, after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Show one task in full.
    Show { id: String },
    /// List the distinct subjects on the board.
    Subjects,
    /// Write the board as JSON to stdout.
    Export,
    /// Merge tasks from JSON on stdin.
    Import,
    /// Seed example tasks into an empty board.
    Demo,
}

/// The control surface: search text, two value filters, sort key and
/// direction, active tab. Unset flags fall back to config defaults.
#[derive(Args, Debug, Default)]
pub struct BoardArgs {
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,

    /// Low, Medium or High.
    #[arg(long)]
    pub priority: Option<String>,

    /// priority, due or title.
    #[arg(long)]
    pub sort: Option<String>,

    /// asc or desc.
    #[arg(long)]
    pub direction: Option<String>,

    /// Focused column: "In Progress", "Completed Task" or "Over-Due".
    #[arg(long)]
    pub tab: Option<String>,
}

/// Form fields given as flags; anything missing is prompted for.
#[derive(Args, Debug, Default, Clone)]
pub struct FormArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Due date in YYYY-MM-DD form.
    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub subject: Option<String>,

    /// Low, Medium or High.
    #[arg(long)]
    pub priority: Option<String>,

    /// "In Progress", "Completed Task" or "Over-Due".
    #[arg(long)]
    pub status: Option<String>,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Command, GlobalCli, KeyVal};

    #[test]
    fn keyval_parses_and_rejects() {
        let kv: KeyVal = "color = off".parse().expect("parse");
        assert_eq!(kv.key, "color");
        assert_eq!(kv.value, "off");
        assert!("no-equals-sign".parse::<KeyVal>().is_err());
    }

    #[test]
    fn board_flags_parse() {
        let cli = GlobalCli::parse_from([
            "taskdeck",
            "board",
            "--search",
            "css",
            "--priority",
            "High",
            "--sort",
            "priority",
            "--direction",
            "desc",
        ]);

        match cli.command {
            Some(Command::Board(args)) => {
                assert_eq!(args.search.as_deref(), Some("css"));
                assert_eq!(args.priority.as_deref(), Some("High"));
                assert_eq!(args.sort.as_deref(), Some("priority"));
                assert_eq!(args.direction.as_deref(), Some("desc"));
            }
            other => panic!("expected board command, got {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_board() {
        let cli = GlobalCli::parse_from(["taskdeck", "-vv"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 2);
    }
}
