//! Upstream ranking publisher
//!
//! A snapshot is described by a metadata document (id, download location,
//! creation date) and its content is a headerless `rank,domain` CSV.

pub mod http;
pub mod parser;

use chrono::NaiveDate;
use toprank_core::errors::{RankError, RankErrorKind, Result};
use toprank_core::model::{RankingRow, SnapshotMetadata};

pub use http::HttpSnapshotSource;
pub use parser::{parse_metadata, parse_ranking_rows};

/// Access to the published ranking snapshots
pub trait SnapshotSource {
    /// Metadata of the snapshot published for `date`
    ///
    /// ## Errors
    ///
    /// - `SourceUnavailable`: network failure, non-success status, an
    ///   undecodable response or a list that is not published yet
    fn fetch_metadata(&self, date: NaiveDate) -> Result<SnapshotMetadata>;

    /// Every row of the snapshot at `download_url`, in file order
    ///
    /// ## Errors
    ///
    /// - `SourceUnavailable`: the download failed
    /// - `MalformedData`: a row could not be parsed
    fn fetch_ranking_rows(&self, download_url: &str) -> Result<Vec<RankingRow>>;
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for &S {
    fn fetch_metadata(&self, date: NaiveDate) -> Result<SnapshotMetadata> {
        (**self).fetch_metadata(date)
    }

    fn fetch_ranking_rows(&self, download_url: &str) -> Result<Vec<RankingRow>> {
        (**self).fetch_ranking_rows(download_url)
    }
}

/// Failures talking to the publisher or reading what it returned
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode metadata: {reason}")]
    Decode { reason: String },

    #[error("list for {date} is not available yet")]
    NotAvailable { date: NaiveDate },

    #[error("line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("failed reading ranking rows: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FetchError> for RankError {
    fn from(err: FetchError) -> Self {
        let kind = match err {
            FetchError::MalformedRow { .. } => RankErrorKind::MalformedData,
            _ => RankErrorKind::SourceUnavailable,
        };
        RankError::new(kind).with_message(err.to_string())
    }
}
