//! Domain identity resolver

use crate::errors::{persistence, write_failure, Result};
use rusqlite::{Connection, OptionalExtension};
use toprank_core::model::DomainId;

/// Outcome of resolving a domain name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainResolution {
    Existing(DomainId),
    Created(DomainId),
}

impl DomainResolution {
    pub fn id(&self) -> DomainId {
        match self {
            DomainResolution::Existing(id) | DomainResolution::Created(id) => *id,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, DomainResolution::Created(_))
    }
}

pub struct DomainRepo;

impl DomainRepo {
    pub fn find_id(conn: &Connection, name: &str) -> Result<Option<DomainId>> {
        let mut stmt = conn
            .prepare_cached("SELECT id FROM domains WHERE name = ?1")
            .map_err(|e| persistence("domain_find_id", e))?;

        let id = stmt
            .query_row([name], |row| row.get::<_, i64>(0))
            .optional()
            .map_err(|e| persistence("domain_find_id", e))?;

        Ok(id.map(DomainId::new))
    }

    /// Insert a domain, returning its identity
    ///
    /// Idempotent: if another writer inserted the same name first, the
    /// existing identity is returned instead of a constraint violation.
    pub fn insert(conn: &Connection, name: &str) -> Result<DomainId> {
        let mut stmt = conn
            .prepare_cached(
                "INSERT INTO domains (name) VALUES (?1)
                 ON CONFLICT (name) DO UPDATE SET name = excluded.name
                 RETURNING id",
            )
            .map_err(|e| write_failure("domain_insert", e))?;

        let id = stmt
            .query_row([name], |row| row.get::<_, i64>(0))
            .map_err(|e| write_failure("domain_insert", e))?;

        Ok(DomainId::new(id))
    }

    /// Look up a domain's identity, creating it when absent
    pub fn resolve(conn: &Connection, name: &str) -> Result<DomainResolution> {
        match Self::find_id(conn, name)? {
            Some(id) => Ok(DomainResolution::Existing(id)),
            None => Ok(DomainResolution::Created(Self::insert(conn, name)?)),
        }
    }

    pub fn count(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM domains", [], |row| row.get(0))
            .map_err(|e| persistence("domain_count", e))
    }
}
