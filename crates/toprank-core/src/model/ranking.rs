use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::DomainId;

/// One row of a downloaded ranking list: 1-based rank and bare domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRow {
    pub rank: u32,
    pub domain: String,
}

impl RankingRow {
    pub fn new(rank: u32, domain: impl Into<String>) -> Self {
        Self {
            rank,
            domain: domain.into(),
        }
    }
}

/// A persisted (domain, snapshot, rank) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub domain_id: DomainId,
    pub snapshot_id: String,
    pub rank: u32,
}

impl RankingEntry {
    pub fn new(domain_id: DomainId, snapshot_id: impl Into<String>, rank: u32) -> Self {
        Self {
            domain_id,
            snapshot_id: snapshot_id.into(),
            rank,
        }
    }
}

/// Read projection: the rank a domain held on one snapshot date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRank {
    pub rank: u32,
    pub date: NaiveDate,
}
