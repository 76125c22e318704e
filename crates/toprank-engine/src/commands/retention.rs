//! Snapshot retention
//!
//! Snapshots older than the retention window are deleted together with
//! their ranking entries, except those created on the last day of a month,
//! which are kept forever. Each deletion runs on its own thread with its own
//! connection; one failing deletion does not stop the others.

use std::thread;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use crossbeam::channel::unbounded;
use toprank_core::calendar::days_before;
use toprank_core::errors::{RankError, RankErrorKind, Result};
use toprank_core::model::RankingSnapshot;
use toprank_core::{log_op_end, log_op_error, log_op_start};
use toprank_core_types::RunId;
use toprank_store::repo::{LedgerRepo, RankingRepo};
use toprank_store::Database;

const OP: &str = "prune_snapshots";

/// What a retention pass removed and kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionReport {
    /// Snapshots created strictly before this date were candidates
    pub cutoff: Option<NaiveDate>,
    /// Deleted snapshot ids, in completion order
    pub deleted: Vec<String>,
    /// Ranking entries removed with them
    pub entries_deleted: usize,
    /// Month-end snapshot ids older than the cutoff that were kept
    pub retained_month_end: Vec<String>,
}

pub struct RetentionOrchestrator {
    db: Database,
    span: tracing::Span,
}

impl RetentionOrchestrator {
    pub fn new(db: Database) -> Self {
        let run_id = RunId::new();
        Self {
            db,
            span: tracing::info_span!("prune", run_id = %run_id),
        }
    }

    /// Log every event of this orchestrator inside `span`
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Prune relative to the current UTC date
    ///
    /// ## Errors
    ///
    /// See [`RetentionOrchestrator::prune`].
    pub fn prune_now(&self, retention_days: i64) -> Result<RetentionReport> {
        self.prune(retention_days, Utc::now().date_naive())
    }

    /// Delete every non-month-end snapshot created before
    /// `today - retention_days`
    ///
    /// All deletions are attempted even when some fail.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`: `retention_days` is negative (nothing is read)
    /// - `Persistence`: candidates could not be listed
    /// - the kind of the first failed deletion, with the failed count in the
    ///   message and the deletion error as source
    pub fn prune(&self, retention_days: i64, today: NaiveDate) -> Result<RetentionReport> {
        let _entered = self.span.enter();

        if retention_days < 0 {
            let err = RankError::new(RankErrorKind::InvalidInput)
                .with_op(OP)
                .with_message(format!(
                    "retention must not be negative, got {} days",
                    retention_days
                ));
            log_op_error!(OP, err, duration_ms = 0u64);
            return Err(err);
        }

        let cutoff = days_before(today, retention_days);
        log_op_start!(OP, cutoff = %cutoff, retention_days = retention_days);
        let start = Instant::now();

        let result = self.prune_before(cutoff);
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(report) => {
                log_op_end!(
                    OP,
                    duration_ms = duration_ms,
                    cutoff = %cutoff,
                    deleted = report.deleted.len() as u64,
                    retained_month_end = report.retained_month_end.len() as u64,
                    row_count = report.entries_deleted as u64
                );
            }
            Err(e) => {
                log_op_error!(OP, e, duration_ms = duration_ms, cutoff = %cutoff);
            }
        }

        result
    }

    fn prune_before(&self, cutoff: NaiveDate) -> Result<RetentionReport> {
        let candidates = {
            let conn = self.db.connect()?;
            LedgerRepo::find_older_than(&conn, cutoff)?
        };

        let (month_end, expired): (Vec<RankingSnapshot>, Vec<RankingSnapshot>) =
            candidates.into_iter().partition(RankingSnapshot::is_month_end);

        let mut report = RetentionReport {
            cutoff: Some(cutoff),
            retained_month_end: month_end.into_iter().map(|s| s.id).collect(),
            ..RetentionReport::default()
        };
        if expired.is_empty() {
            return Ok(report);
        }

        let (tx, rx) = unbounded::<(String, Result<usize>)>();
        let span = &self.span;
        let db = &self.db;

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(expired.len());
            for snapshot in &expired {
                let tx = tx.clone();
                handles.push((
                    snapshot.id.as_str(),
                    scope.spawn(move || {
                        let _entered = span.enter();
                        let outcome = delete_snapshot(db, snapshot);
                        // The receiver outlives the scope
                        let _ = tx.send((snapshot.id.clone(), outcome));
                    }),
                ));
            }

            for (snapshot_id, handle) in handles {
                if handle.join().is_err() {
                    let panicked = RankError::new(RankErrorKind::Internal)
                        .with_op("delete_snapshot")
                        .with_snapshot_id(snapshot_id)
                        .with_message("deletion thread panicked");
                    let _ = tx.send((snapshot_id.to_string(), Err(panicked)));
                }
            }
        });
        drop(tx);

        let mut first_error: Option<RankError> = None;
        let mut failed = 0;
        for (snapshot_id, outcome) in rx.iter() {
            match outcome {
                Ok(entries) => {
                    report.entries_deleted += entries;
                    report.deleted.push(snapshot_id);
                }
                Err(err) => {
                    tracing::warn!(
                        snapshot_id = snapshot_id.as_str(),
                        err_code = err.code(),
                        error = %err,
                        "snapshot deletion failed"
                    );
                    failed += 1;
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        match first_error {
            None => Ok(report),
            Some(first) => {
                let mut err = RankError::new(first.kind())
                    .with_op(OP)
                    .with_message(format!(
                        "{} of {} snapshot deletions failed ({} deleted)",
                        failed,
                        expired.len(),
                        report.deleted.len()
                    ));
                if let Some(id) = first.snapshot_id() {
                    err = err.with_snapshot_id(id.to_string());
                }
                Err(err.with_source(first))
            }
        }
    }
}

/// Remove one snapshot's entries, then its ledger row
///
/// The two deletes are separate statements; an interrupted deletion leaves
/// a ledger row with fewer entries, which the next pass removes.
fn delete_snapshot(db: &Database, snapshot: &RankingSnapshot) -> Result<usize> {
    let with_context = |e: RankError| {
        RankError::new(e.kind())
            .with_op("delete_snapshot")
            .with_snapshot_id(snapshot.id.as_str())
            .with_date(snapshot.created_on)
            .with_message("snapshot deletion failed")
            .with_source(e)
    };

    let conn = db.connect().map_err(with_context)?;
    let entries = RankingRepo::delete_by_snapshot_id(&conn, &snapshot.id).map_err(with_context)?;
    LedgerRepo::delete_by_id(&conn, &snapshot.id).map_err(with_context)?;

    tracing::info!(
        snapshot_id = snapshot.id.as_str(),
        created_on = %snapshot.created_on,
        row_count = entries as u64,
        "deleted snapshot and its rankings"
    );
    Ok(entries)
}
