//! Transactional unit of work
//!
//! The transaction is handed to `work` explicitly; repositories called with
//! it (`&tx` derefs to `&Connection`) take part in the same atomic unit.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use toprank_core::errors::{RankError, RankErrorKind, Result};

/// Run `work` inside one transaction
///
/// Commits when `work` succeeds. When `work` fails the transaction is rolled
/// back and the original error is returned.
///
/// ## Errors
///
/// - whatever `work` returns, unchanged, after a successful rollback
/// - `TransactionFailure`: begin or commit failed, or rollback failed after
///   `work` failed (the work error is kept as the source)
pub fn run_in_transaction<T, F>(conn: &mut Connection, work: F) -> Result<T>
where
    F: FnOnce(&Transaction<'_>) -> Result<T>,
{
    // IMMEDIATE takes the write lock up front so a busy database surfaces
    // before any work is done
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| {
            RankError::new(RankErrorKind::TransactionFailure)
                .with_op("begin_transaction")
                .with_message(e.to_string())
        })?;

    match work(&tx) {
        Ok(value) => {
            // A failed commit drops the transaction, which rolls it back
            tx.commit().map_err(|e| {
                RankError::new(RankErrorKind::TransactionFailure)
                    .with_op("commit_transaction")
                    .with_message(format!("commit failed, transaction rolled back: {}", e))
            })?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback() {
                tracing::error!(
                    error = %err,
                    rollback_error = %rollback_err,
                    "rollback failed after work error"
                );
                return Err(RankError::new(RankErrorKind::TransactionFailure)
                    .with_op("rollback_transaction")
                    .with_message(format!(
                        "work error: {}, rollback error: {}",
                        err, rollback_err
                    ))
                    .with_source(err));
            }
            tracing::debug!(error = %err, "transaction rolled back");
            Err(err)
        }
    }
}
