#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::TempDir;
use toprank_core::errors::{RankError, RankErrorKind, Result};
use toprank_core::model::{RankingRow, SnapshotMetadata};
use toprank_core::RetryPolicy;
use toprank_engine::{IngestConfig, SnapshotSource};
use toprank_store::migrations::apply_migrations;
use toprank_store::Database;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Migrated database in a temp dir; keep the `TempDir` alive for the test
pub fn setup_db() -> (TempDir, Database, Connection) {
    let dir = TempDir::new().unwrap();
    let db = Database::new(dir.path().join("toprank.db"));
    let mut conn = db.connect().unwrap();
    apply_migrations(&mut conn).unwrap();
    (dir, db, conn)
}

pub fn config(batch_size: usize) -> IngestConfig {
    IngestConfig {
        batch_size,
        retry: RetryPolicy::fixed(3, Duration::ZERO),
    }
}

pub fn rows(pairs: &[(u32, &str)]) -> Vec<RankingRow> {
    pairs
        .iter()
        .map(|(rank, domain)| RankingRow::new(*rank, *domain))
        .collect()
}

pub fn unavailable() -> RankError {
    RankError::new(RankErrorKind::SourceUnavailable).with_message("connection reset")
}

/// Scripted snapshot source that counts its calls
///
/// Queued failures are returned (in order) before the real answer.
pub struct FakeSource {
    metadata: SnapshotMetadata,
    rows: Result<Vec<RankingRow>>,
    metadata_failures: RefCell<VecDeque<RankError>>,
    row_failures: RefCell<VecDeque<RankError>>,
    pub metadata_calls: Cell<u32>,
    pub row_calls: Cell<u32>,
}

impl FakeSource {
    pub fn new(snapshot_id: &str, created_on: NaiveDate, rows: Vec<RankingRow>) -> Self {
        Self {
            metadata: SnapshotMetadata::new(
                snapshot_id,
                format!("https://lists.test/download/{}", snapshot_id),
                created_on,
            ),
            rows: Ok(rows),
            metadata_failures: RefCell::new(VecDeque::new()),
            row_failures: RefCell::new(VecDeque::new()),
            metadata_calls: Cell::new(0),
            row_calls: Cell::new(0),
        }
    }

    pub fn with_rows_error(mut self, err: RankError) -> Self {
        self.rows = Err(err);
        self
    }

    pub fn fail_metadata(self, times: usize, err: impl Fn() -> RankError) -> Self {
        self.metadata_failures
            .borrow_mut()
            .extend((0..times).map(|_| err()));
        self
    }

    pub fn fail_rows(self, times: usize, err: impl Fn() -> RankError) -> Self {
        self.row_failures
            .borrow_mut()
            .extend((0..times).map(|_| err()));
        self
    }
}

impl SnapshotSource for FakeSource {
    fn fetch_metadata(&self, _date: NaiveDate) -> Result<SnapshotMetadata> {
        self.metadata_calls.set(self.metadata_calls.get() + 1);
        if let Some(err) = self.metadata_failures.borrow_mut().pop_front() {
            return Err(err);
        }
        Ok(self.metadata.clone())
    }

    fn fetch_ranking_rows(&self, download_url: &str) -> Result<Vec<RankingRow>> {
        self.row_calls.set(self.row_calls.get() + 1);
        assert_eq!(download_url, self.metadata.download_url);
        if let Some(err) = self.row_failures.borrow_mut().pop_front() {
            return Err(err);
        }
        self.rows.clone()
    }
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}
