//! Ranking store: bulk writes of (domain, list, rank) triples

use crate::errors::{persistence, write_failure, Result};
use rusqlite::types::ToSql;
use rusqlite::Connection;
use toprank_core::config::MAX_BATCH_SIZE;
use toprank_core::errors::{RankError, RankErrorKind};
use toprank_core::model::RankingEntry;

/// Writes ranking entries in fixed-size multi-row inserts
#[derive(Debug, Clone, Copy)]
pub struct RankingRepo {
    batch_size: usize,
}

impl RankingRepo {
    /// ## Errors
    ///
    /// - `InvalidInput`: batch size is zero or would exceed SQLite's bound
    ///   parameter limit
    pub fn new(batch_size: usize) -> Result<Self> {
        if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
            return Err(RankError::new(RankErrorKind::InvalidInput)
                .with_op("ranking_repo_new")
                .with_message(format!(
                    "batch size {} outside 1..={}",
                    batch_size, MAX_BATCH_SIZE
                )));
        }
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Insert all entries, one multi-row INSERT per batch
    ///
    /// Input order is preserved within each batch. A failing batch aborts the
    /// call; earlier batches are not undone here, the caller's transaction
    /// rollback is the recovery mechanism.
    ///
    /// ## Returns
    ///
    /// Number of batches issued
    ///
    /// ## Errors
    ///
    /// - `WriteFailure`: a batch insert failed (message names the batch)
    pub fn bulk_save(&self, conn: &Connection, entries: &[RankingEntry]) -> Result<usize> {
        let mut batches = 0;
        for (index, chunk) in entries.chunks(self.batch_size).enumerate() {
            self.insert_batch(conn, chunk).map_err(|e| {
                let mut err = RankError::new(RankErrorKind::WriteFailure)
                    .with_op("ranking_bulk_save")
                    .with_message(format!(
                        "batch {} ({} rows starting at row {}) failed",
                        index,
                        chunk.len(),
                        index * self.batch_size
                    ));
                if let Some(first) = chunk.first() {
                    err = err.with_snapshot_id(&first.snapshot_id);
                }
                err.with_source(e)
            })?;
            batches += 1;

            tracing::debug!(batch = index, rank_count = chunk.len(), "ranking batch saved");
        }
        Ok(batches)
    }

    fn insert_batch(&self, conn: &Connection, chunk: &[RankingEntry]) -> Result<()> {
        let sql = insert_sql(chunk.len());
        let mut stmt = conn
            .prepare_cached(&sql)
            .map_err(|e| write_failure("ranking_insert_batch", e))?;

        let domain_ids: Vec<i64> = chunk.iter().map(|e| e.domain_id.get()).collect();
        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(chunk.len() * 3);
        for (entry, domain_id) in chunk.iter().zip(&domain_ids) {
            params.push(domain_id);
            params.push(&entry.snapshot_id);
            params.push(&entry.rank);
        }

        stmt.execute(params.as_slice())
            .map_err(|e| write_failure("ranking_insert_batch", e))?;
        Ok(())
    }

    /// Remove every entry of one snapshot; returns the number removed
    pub fn delete_by_snapshot_id(conn: &Connection, snapshot_id: &str) -> Result<usize> {
        conn.execute(
            "DELETE FROM ranking_entries WHERE list_id = ?1",
            [snapshot_id],
        )
        .map_err(|e| write_failure("ranking_delete", e).with_snapshot_id(snapshot_id))
    }

    pub fn count_for_snapshot(conn: &Connection, snapshot_id: &str) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM ranking_entries WHERE list_id = ?1",
            [snapshot_id],
            |row| row.get(0),
        )
        .map_err(|e| persistence("ranking_count", e).with_snapshot_id(snapshot_id))
    }
}

fn insert_sql(rows: usize) -> String {
    let mut sql =
        String::from("INSERT INTO ranking_entries (domain_id, list_id, rank) VALUES ");
    for i in 0..rows {
        if i > 0 {
            sql.push(',');
        }
        sql.push_str("(?,?,?)");
    }
    sql
}
