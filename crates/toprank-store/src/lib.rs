//! toprank store - SQLite persistence for ranking snapshots
//!
//! Provides:
//! - Connection management (`Database`) with per-connection pragmas
//! - Embedded, checksummed migrations
//! - Repositories: list ledger, domain identities, ranking entries and the
//!   daily rank read projection
//! - A transactional unit of work
//!
//! Every repository function takes the connection it runs on explicitly.
//! A `rusqlite::Transaction` derefs to a `Connection`, so passing `&tx`
//! enlists the call in the caller's transaction.

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod unit_of_work;

// Re-export key types
pub use db::Database;
pub use repo::{DailyRankRepo, DomainRepo, DomainResolution, LedgerRepo, RankingRepo};
pub use unit_of_work::run_in_transaction;
