//! kada CLI
//!
//! Track activities from the command line.
//!
//! # Commands
//!
//! - `start` - Open an activity
//! - `end` - Close an open activity
//! - `span` - List, backfill or remove spans
//! - `marks` - List open activities

mod commands;
mod date;

use clap::{Parser, Subcommand, ValueEnum};
use kada_codec::{CborCodec, Codec, JsonCodec};
use kada_core::{Config, Db, Mark, Span};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const APP_NAME: &str = "kada";

/// Record when activities start and end.
#[derive(Parser)]
#[command(name = "kada")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the storage directory
    #[arg(global = true, short, long, env = "KADA_DIR")]
    path: Option<PathBuf>,

    /// Record file format
    #[arg(global = true, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Cbor,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an activity
    Start {
        /// Activity name
        name: String,

        /// Free-text description
        description: Option<String>,

        /// Start time (YYYY-MM-DD HH:MM:SS, local) instead of now
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Close an open activity
    End {
        /// Activity name
        name: String,

        /// Free-text description
        description: Option<String>,
    },

    /// List, add or remove spans (lists when no action is given)
    Span {
        #[command(subcommand)]
        action: Option<SpanAction>,
    },

    /// List open activities
    Marks,

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum SpanAction {
    /// List all spans
    List,

    /// Record a finished activity
    Add {
        /// Activity name
        name: String,

        /// Start time (YYYY-MM-DD HH:MM:SS, local)
        start: String,

        /// End time (YYYY-MM-DD HH:MM:SS, local)
        end: String,
    },

    /// Remove the only span with this name
    Remove {
        /// Span name
        name: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Version = cli.command {
        println!("kada CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("kada core v{}", kada_core::VERSION);
        return Ok(());
    }

    let root = match cli.path {
        Some(path) => path,
        None => default_data_dir()?,
    };
    debug!(root = %root.display(), format = ?cli.format, "opening store");

    let config = Config::new(root);
    match cli.format {
        Format::Json => run(cli.command, &Db::open_with_codec(&config, JsonCodec)),
        Format::Cbor => run(cli.command, &Db::open_with_codec(&config, CborCodec)),
    }
}

fn run<C>(command: Commands, db: &Db<C>) -> Result<(), Box<dyn std::error::Error>>
where
    C: Codec<Mark> + Codec<Span> + Clone,
{
    db.setup()
        .map_err(|err| format!("unable to set up the store: {err}"))?;

    match command {
        Commands::Start {
            name,
            description,
            date,
        } => commands::start::run(db, &name, description.unwrap_or_default(), date.as_deref())?,
        Commands::End { name, description } => {
            commands::end::run(db, &name, description.unwrap_or_default())?;
        }
        Commands::Span { action } => match action.unwrap_or(SpanAction::List) {
            SpanAction::List => commands::span::list(db)?,
            SpanAction::Add { name, start, end } => commands::span::add(db, &name, &start, &end)?,
            SpanAction::Remove { name } => commands::span::remove(db, &name)?,
        },
        Commands::Marks => commands::marks::run(db)?,
        Commands::Version => {}
    }

    Ok(())
}

/// Platform data directory for kada, e.g. `~/.local/share/kada`.
fn default_data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base = dirs::data_dir().ok_or("unable to locate the user's data directory")?;
    Ok(base.join(APP_NAME))
}
