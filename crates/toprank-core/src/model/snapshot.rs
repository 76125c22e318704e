use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A ranking list publication as described by the upstream metadata endpoint
///
/// `created_on` is the day the list represents, not the day it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub snapshot_id: String,
    pub download_url: String,
    pub created_on: NaiveDate,
}

impl SnapshotMetadata {
    pub fn new(
        snapshot_id: impl Into<String>,
        download_url: impl Into<String>,
        created_on: NaiveDate,
    ) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            download_url: download_url.into(),
            created_on,
        }
    }

    /// The ledger row recorded once this snapshot is ingested
    pub fn to_snapshot(&self) -> RankingSnapshot {
        RankingSnapshot {
            id: self.snapshot_id.clone(),
            created_on: self.created_on,
        }
    }
}

/// A ledger row: one ingested snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub id: String,
    pub created_on: NaiveDate,
}

impl RankingSnapshot {
    pub fn new(id: impl Into<String>, created_on: NaiveDate) -> Self {
        Self {
            id: id.into(),
            created_on,
        }
    }

    /// Month-end snapshots are kept forever as coarse monthly history
    pub fn is_month_end(&self) -> bool {
        crate::calendar::is_last_day_of_month(self.created_on)
    }
}
