//! Prune command

use clap::Args;
use toprank_core::errors::{RankError, RankErrorKind};
use toprank_core::{Result, Settings};
use toprank_engine::RetentionOrchestrator;

#[derive(Debug, Args)]
pub struct PruneArgs {
    /// Keep snapshots from the last N days, `retention_days` when omitted
    #[arg(long, allow_negative_numbers = true)]
    pub since: Option<i64>,
}

pub fn execute(args: PruneArgs, settings: &Settings) -> Result<()> {
    let retention_days = args.since.unwrap_or(settings.retention_days);
    // Rejected before the database is created or migrated
    if retention_days < 0 {
        return Err(RankError::new(RankErrorKind::InvalidInput)
            .with_op("prune_snapshots")
            .with_message(format!("--since must not be negative, got {}", retention_days)));
    }

    let db = super::open_database(&settings.database_path)?;
    let report = RetentionOrchestrator::new(db).prune_now(retention_days)?;

    println!("Retention complete:");
    if let Some(cutoff) = report.cutoff {
        println!("  cutoff: {}", cutoff);
    }
    println!("  deleted: {}", report.deleted.len());
    println!("  entries_deleted: {}", report.entries_deleted);
    println!("  retained_month_end: {}", report.retained_month_end.len());
    Ok(())
}
