//! Snapshot ingestion
//!
//! One run ingests the snapshot published for a target date:
//!
//! 1. fetch metadata (retried on transient failures)
//! 2. skip when the snapshot id is already in the ledger
//! 3. download and parse every row (one attempt)
//! 4. in one transaction: record the ledger row, resolve each domain to its
//!    id and bulk insert the ranking entries
//! 5. commit
//!
//! Any failure in 4 or 5 rolls the whole snapshot back, so a later run for
//! the same date starts from a clean ledger.

use std::collections::HashMap;
use std::time::Instant;

use chrono::NaiveDate;
use rusqlite::{Connection, Transaction};
use toprank_core::config::Settings;
use toprank_core::errors::{RankError, Result};
use toprank_core::model::{DomainId, RankingEntry, RankingRow, SnapshotMetadata};
use toprank_core::{log_op_end, log_op_error, log_op_skip, log_op_start};
use toprank_core::{CancelFlag, RetryPolicy};
use toprank_core_types::RunId;
use toprank_store::repo::{DomainRepo, LedgerRepo, RankingRepo};
use toprank_store::run_in_transaction;

use crate::source::SnapshotSource;

const OP: &str = "ingest_snapshot";

/// Rows between progress lines while resolving domains
const PROGRESS_EVERY: usize = 100_000;

/// Tuning for an ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Ranking entries per multi-row insert
    pub batch_size: usize,
    /// Applied to the metadata fetch only
    pub retry: RetryPolicy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for IngestConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            batch_size: settings.batch_size,
            retry: settings.retry_policy(),
        }
    }
}

/// Pipeline stage an ingestion failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    FetchMetadata,
    CheckIdempotency,
    DownloadRows,
    Reconcile,
    Commit,
}

impl IngestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestStage::FetchMetadata => "fetch_metadata",
            IngestStage::CheckIdempotency => "check_idempotency",
            IngestStage::DownloadRows => "download_rows",
            IngestStage::Reconcile => "reconcile",
            IngestStage::Commit => "commit",
        }
    }
}

impl std::fmt::Display for IngestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a committed ingestion wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub snapshot_id: String,
    pub created_on: NaiveDate,
    /// Ranking entries inserted (one per downloaded row)
    pub entries: usize,
    /// Domains first seen in this snapshot
    pub new_domains: usize,
    /// Multi-row inserts issued
    pub batches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The snapshot was already in the ledger; nothing was written
    AlreadyIngested { snapshot_id: String },
    Ingested(IngestSummary),
}

impl IngestOutcome {
    pub fn snapshot_id(&self) -> &str {
        match self {
            IngestOutcome::AlreadyIngested { snapshot_id } => snapshot_id,
            IngestOutcome::Ingested(summary) => &summary.snapshot_id,
        }
    }
}

/// Runs the ingestion pipeline against one snapshot source
pub struct IngestionOrchestrator<S> {
    source: S,
    rankings: RankingRepo,
    retry: RetryPolicy,
    span: tracing::Span,
}

impl<S: SnapshotSource> IngestionOrchestrator<S> {
    /// ## Errors
    ///
    /// - `InvalidInput`: batch size outside `1..=MAX_BATCH_SIZE`
    pub fn new(source: S, config: IngestConfig) -> Result<Self> {
        let run_id = RunId::new();
        Ok(Self {
            source,
            rankings: RankingRepo::new(config.batch_size)?,
            retry: config.retry,
            span: tracing::info_span!("ingest", run_id = %run_id),
        })
    }

    /// Log every event of this orchestrator inside `span`
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Ingest the snapshot published for `date`
    ///
    /// Re-running for a date whose snapshot is already recorded returns
    /// `AlreadyIngested` without downloading or writing anything.
    ///
    /// ## Errors
    ///
    /// The first failure, carrying the stage, the date and (once known) the
    /// snapshot id. Its kind is the kind of the underlying failure:
    /// `SourceUnavailable`, `MalformedData`, `DuplicateKey`, `WriteFailure`,
    /// `TransactionFailure`, `Persistence` or `Cancelled`.
    pub fn ingest(
        &self,
        conn: &mut Connection,
        date: NaiveDate,
        cancel: &CancelFlag,
    ) -> Result<IngestOutcome> {
        let _entered = self.span.enter();
        log_op_start!(OP, date = %date);
        let start = Instant::now();

        let result = self.run(conn, date, cancel);
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(IngestOutcome::AlreadyIngested { snapshot_id }) => {
                log_op_skip!(
                    OP,
                    snapshot_id = snapshot_id.as_str(),
                    date = %date,
                    duration_ms = duration_ms,
                    "snapshot already ingested"
                );
            }
            Ok(IngestOutcome::Ingested(summary)) => {
                log_op_end!(
                    OP,
                    duration_ms = duration_ms,
                    snapshot_id = summary.snapshot_id.as_str(),
                    date = %date,
                    row_count = summary.entries as u64,
                    batch_count = summary.batches as u64,
                    new_domains = summary.new_domains as u64
                );
            }
            Err(e) => {
                log_op_error!(OP, e, duration_ms = duration_ms, date = %date);
            }
        }

        result
    }

    fn run(
        &self,
        conn: &mut Connection,
        date: NaiveDate,
        cancel: &CancelFlag,
    ) -> Result<IngestOutcome> {
        cancel
            .check(OP)
            .map_err(|e| stage_error(e, IngestStage::FetchMetadata, date, None))?;
        let metadata = self
            .retry
            .run(|attempt| {
                tracing::debug!(attempt, date = %date, "fetching snapshot metadata");
                self.source.fetch_metadata(date)
            })
            .map_err(|e| stage_error(e, IngestStage::FetchMetadata, date, None))?;
        let id = metadata.snapshot_id.as_str();

        let exists = LedgerRepo::exists(conn, id)
            .map_err(|e| stage_error(e, IngestStage::CheckIdempotency, date, Some(id)))?;
        if exists {
            return Ok(IngestOutcome::AlreadyIngested {
                snapshot_id: metadata.snapshot_id.clone(),
            });
        }

        cancel
            .check(OP)
            .map_err(|e| stage_error(e, IngestStage::DownloadRows, date, Some(id)))?;
        // Single attempt: a failed download aborts the run before any write
        tracing::debug!(snapshot_id = id, "downloading ranking rows");
        let rows = self
            .source
            .fetch_ranking_rows(&metadata.download_url)
            .map_err(|e| stage_error(e, IngestStage::DownloadRows, date, Some(id)))?;

        cancel
            .check(OP)
            .map_err(|e| stage_error(e, IngestStage::Reconcile, date, Some(id)))?;
        let summary = run_in_transaction(conn, |tx| self.reconcile(tx, &metadata, &rows, cancel))
            .map_err(|e| {
                // Everything inside the transaction is reconcile work except
                // the final commit
                let stage = if e.op() == Some("commit_transaction") {
                    IngestStage::Commit
                } else {
                    IngestStage::Reconcile
                };
                stage_error(e, stage, date, Some(id))
            })?;

        Ok(IngestOutcome::Ingested(summary))
    }

    fn reconcile(
        &self,
        tx: &Transaction<'_>,
        metadata: &SnapshotMetadata,
        rows: &[RankingRow],
        cancel: &CancelFlag,
    ) -> Result<IngestSummary> {
        LedgerRepo::save(tx, &metadata.to_snapshot())?;

        let mut resolved: HashMap<&str, DomainId> = HashMap::new();
        let mut new_domains = 0;
        let mut entries = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let domain_id = match resolved.get(row.domain.as_str()) {
                Some(id) => *id,
                None => {
                    let resolution = DomainRepo::resolve(tx, &row.domain)?;
                    if resolution.was_created() {
                        new_domains += 1;
                    }
                    resolved.insert(row.domain.as_str(), resolution.id());
                    resolution.id()
                }
            };
            entries.push(RankingEntry::new(
                domain_id,
                metadata.snapshot_id.as_str(),
                row.rank,
            ));

            if (index + 1) % PROGRESS_EVERY == 0 {
                tracing::debug!(
                    snapshot_id = metadata.snapshot_id.as_str(),
                    rows = index + 1,
                    total = rows.len(),
                    "resolving domains"
                );
            }
        }

        cancel.check(OP)?;
        let batches = self.rankings.bulk_save(tx, &entries)?;

        Ok(IngestSummary {
            snapshot_id: metadata.snapshot_id.clone(),
            created_on: metadata.created_on,
            entries: entries.len(),
            new_domains,
            batches,
        })
    }
}

fn stage_error(
    cause: RankError,
    stage: IngestStage,
    date: NaiveDate,
    snapshot_id: Option<&str>,
) -> RankError {
    let mut err = RankError::new(cause.kind())
        .with_op(OP)
        .with_stage(stage.as_str())
        .with_date(date)
        .with_message(format!("{} failed", stage));
    if let Some(id) = snapshot_id {
        err = err.with_snapshot_id(id);
    }
    err.with_source(cause)
}
