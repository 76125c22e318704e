//! toprank engine - ingestion and retention orchestration
//!
//! Coordinates the upstream snapshot source with the store:
//! - `source`: snapshot metadata and ranking rows from the publisher
//! - `commands::ingest`: fetch, reconcile and persist one snapshot atomically
//! - `commands::retention`: prune old non-month-end snapshots concurrently

pub mod commands;
pub mod source;

pub use commands::ingest::{IngestConfig, IngestOutcome, IngestStage, IngestSummary, IngestionOrchestrator};
pub use commands::retention::{RetentionOrchestrator, RetentionReport};
pub use source::{HttpSnapshotSource, SnapshotSource};
