//! Ingest command

use chrono::{NaiveDate, Utc};
use clap::Args;
use toprank_core::{CancelFlag, Result, Settings};
use toprank_engine::{HttpSnapshotSource, IngestConfig, IngestOutcome, IngestionOrchestrator};

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Target date (YYYY-MM-DD), today (UTC) when omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub fn execute(args: IngestArgs, settings: &Settings) -> Result<()> {
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let db = super::open_database(&settings.database_path)?;
    let mut conn = db.connect()?;

    let source = HttpSnapshotSource::from_settings(settings)?;
    let orchestrator = IngestionOrchestrator::new(source, IngestConfig::from(settings))?;

    match orchestrator.ingest(&mut conn, date, &CancelFlag::new())? {
        IngestOutcome::AlreadyIngested { snapshot_id } => {
            println!("Snapshot {} already ingested, nothing to do", snapshot_id);
        }
        IngestOutcome::Ingested(summary) => {
            println!("Snapshot ingested:");
            println!("  snapshot_id: {}", summary.snapshot_id);
            println!("  created_on: {}", summary.created_on);
            println!("  entries: {}", summary.entries);
            println!("  new_domains: {}", summary.new_domains);
        }
    }
    Ok(())
}
