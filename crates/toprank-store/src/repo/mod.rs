//! Repositories over the ranking schema
//!
//! Stateless functions taking the connection (or transaction) to run on.

pub mod daily_rank;
pub mod domains;
pub mod ledger;
pub mod rankings;

pub use daily_rank::DailyRankRepo;
pub use domains::{DomainRepo, DomainResolution};
pub use ledger::LedgerRepo;
pub use rankings::RankingRepo;
