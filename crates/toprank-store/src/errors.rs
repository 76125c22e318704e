//! Error helpers for toprank-store
//!
//! Translate `rusqlite::Error` into the canonical `RankError`

use rusqlite::{ffi, ErrorCode};
use toprank_core::errors::{RankError, RankErrorKind};

pub use toprank_core::errors::Result;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> RankError {
    RankError::new(RankErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error for an already-applied migration
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> RankError {
    RankError::new(RankErrorKind::Persistence)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> RankError {
    RankError::new(RankErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Read-side failure of a named operation
pub fn persistence(op: &str, err: rusqlite::Error) -> RankError {
    RankError::new(RankErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// Write-side failure of a named operation
///
/// Primary-key and unique violations become `DuplicateKey`; everything else
/// is a `WriteFailure`.
pub fn write_failure(op: &str, err: rusqlite::Error) -> RankError {
    let kind = if is_unique_violation(&err) {
        RankErrorKind::DuplicateKey
    } else {
        RankErrorKind::WriteFailure
    };
    RankError::new(kind)
        .with_op(op.to_string())
        .with_message(err.to_string())
}

/// True for SQLite PRIMARY KEY / UNIQUE constraint failures
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE)
        }
        _ => false,
    }
}
