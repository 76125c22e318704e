//! toprank CLI
//!
//! Batch entry points for the ranking ingestion and retention jobs

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use toprank_core::logging_facility::{self, Profile};
use toprank_core::{Result, Settings};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "toprank")]
#[command(about = "toprank - daily domain ranking ingestion", long_about = None)]
struct Cli {
    /// Settings file (TOML); built-in defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding `database_path` from the settings
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Emit JSON logs
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingest the ranking list published for a date
    Ingest(commands::ingest::IngestArgs),
    /// Delete old snapshots, keeping month-end ones
    Prune(commands::prune::PruneArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    if let Err(e) = run(cli) {
        tracing::error!(err_code = e.code(), error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        settings.database_path = db;
    }

    match cli.command {
        Commands::Ingest(args) => commands::ingest::execute(args, &settings),
        Commands::Prune(args) => commands::prune::execute(args, &settings),
    }
}
