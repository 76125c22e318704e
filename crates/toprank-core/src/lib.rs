//! toprank core - domain model and ambient facilities
//!
//! This crate provides the pieces shared by the store, the pipelines and
//! the CLI:
//! - Snapshot, domain and ranking entry models
//! - Structured error facility (`RankError` / `RankErrorKind`)
//! - Structured logging facility and canonical log macros
//! - Settings, retry policy, cancellation and calendar helpers

pub mod calendar;
pub mod cancel;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod retry;

// Used by the exported logging macros
pub use toprank_core_types;

// Re-export commonly used types
pub use cancel::CancelFlag;
pub use config::Settings;
pub use errors::{RankError, RankErrorKind, Result};
pub use model::{DailyRank, DomainId, RankingEntry, RankingRow, RankingSnapshot, SnapshotMetadata};
pub use retry::RetryPolicy;
