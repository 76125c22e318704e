//! Domain models for ranking snapshots, domains and ranking entries

pub mod domain;
pub mod ranking;
pub mod snapshot;

pub use domain::DomainId;
pub use ranking::{DailyRank, RankingEntry, RankingRow};
pub use snapshot::{RankingSnapshot, SnapshotMetadata};
