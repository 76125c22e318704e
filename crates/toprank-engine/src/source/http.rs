//! Blocking HTTP client for the ranking publisher

use std::io::BufReader;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use toprank_core::config::Settings;
use toprank_core::errors::{RankError, RankErrorKind, Result};
use toprank_core::model::{RankingRow, SnapshotMetadata};

use super::parser::{parse_metadata, parse_ranking_rows};
use super::{FetchError, SnapshotSource};

const USER_AGENT: &str = concat!("toprank/", env!("CARGO_PKG_VERSION"));

/// Snapshot source backed by the publisher's HTTP API
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: Client,
    metadata_endpoint: String,
}

impl HttpSnapshotSource {
    /// `metadata_endpoint` is the prefix the `YYYY-MM-DD` date is appended to
    pub fn new(metadata_endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                RankError::new(RankErrorKind::Internal)
                    .with_op("build_http_client")
                    .with_message(e.to_string())
            })?;

        Ok(Self {
            client,
            metadata_endpoint: metadata_endpoint.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.metadata_endpoint.clone(), settings.http_timeout())
    }

    fn metadata_url(&self, date: NaiveDate) -> String {
        format!("{}{}", self.metadata_endpoint, date.format("%Y-%m-%d"))
    }

    fn get(&self, url: &str) -> std::result::Result<Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl SnapshotSource for HttpSnapshotSource {
    fn fetch_metadata(&self, date: NaiveDate) -> Result<SnapshotMetadata> {
        let url = self.metadata_url(date);
        tracing::debug!(url = %url, "requesting snapshot metadata");

        let body = self
            .get(&url)?
            .text()
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let metadata = parse_metadata(&body, date).map_err(|e| {
            RankError::from(e)
                .with_op("fetch_metadata")
                .with_date(date)
        })?;
        Ok(metadata)
    }

    fn fetch_ranking_rows(&self, download_url: &str) -> Result<Vec<RankingRow>> {
        tracing::debug!(url = %download_url, "downloading ranking rows");

        let response = self.get(download_url)?;
        let rows = parse_ranking_rows(BufReader::new(response))
            .map_err(|e| RankError::from(e).with_op("fetch_ranking_rows"))?;

        tracing::debug!(rows = rows.len(), "ranking rows downloaded");
        Ok(rows)
    }
}
