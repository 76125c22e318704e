//! List ledger: which ranking snapshots have been ingested

use crate::errors::{persistence, write_failure, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use toprank_core::model::RankingSnapshot;

pub struct LedgerRepo;

impl LedgerRepo {
    /// Whether a snapshot with this id was already ingested
    pub fn exists(conn: &Connection, snapshot_id: &str) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM ranking_lists WHERE id = ?1)",
            [snapshot_id],
            |row| row.get(0),
        )
        .map_err(|e| persistence("ledger_exists", e).with_snapshot_id(snapshot_id))
    }

    /// Record a snapshot
    ///
    /// ## Errors
    ///
    /// - `DuplicateKey`: the id is already in the ledger
    /// - `WriteFailure`: any other insert failure
    pub fn save(conn: &Connection, snapshot: &RankingSnapshot) -> Result<()> {
        conn.execute(
            "INSERT INTO ranking_lists (id, created_on) VALUES (?1, ?2)",
            rusqlite::params![snapshot.id, snapshot.created_on],
        )
        .map_err(|e| {
            write_failure("ledger_save", e)
                .with_snapshot_id(&snapshot.id)
                .with_date(snapshot.created_on)
        })?;

        tracing::debug!(snapshot_id = %snapshot.id, created_on = %snapshot.created_on, "ledger row saved");

        Ok(())
    }

    pub fn get(conn: &Connection, snapshot_id: &str) -> Result<Option<RankingSnapshot>> {
        conn.query_row(
            "SELECT id, created_on FROM ranking_lists WHERE id = ?1",
            [snapshot_id],
            |row| {
                Ok(RankingSnapshot {
                    id: row.get(0)?,
                    created_on: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(|e| persistence("ledger_get", e).with_snapshot_id(snapshot_id))
    }

    /// Snapshots created strictly before `cutoff`, oldest first
    pub fn find_older_than(conn: &Connection, cutoff: NaiveDate) -> Result<Vec<RankingSnapshot>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, created_on FROM ranking_lists
                 WHERE created_on < ?1
                 ORDER BY created_on, id",
            )
            .map_err(|e| persistence("ledger_find_older_than", e))?;

        let snapshots = stmt
            .query_map([cutoff], |row| {
                Ok(RankingSnapshot {
                    id: row.get(0)?,
                    created_on: row.get(1)?,
                })
            })
            .map_err(|e| persistence("ledger_find_older_than", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| persistence("ledger_find_older_than", e))?;

        Ok(snapshots)
    }

    /// Remove one ledger row; returns whether a row existed
    pub fn delete_by_id(conn: &Connection, snapshot_id: &str) -> Result<bool> {
        let removed = conn
            .execute("DELETE FROM ranking_lists WHERE id = ?1", [snapshot_id])
            .map_err(|e| write_failure("ledger_delete", e).with_snapshot_id(snapshot_id))?;
        Ok(removed > 0)
    }
}
