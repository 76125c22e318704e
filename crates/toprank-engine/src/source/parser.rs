//! Decoding of publisher responses

use std::io::{self, BufRead};

use chrono::NaiveDate;
use serde::Deserialize;
use toprank_core::model::{RankingRow, SnapshotMetadata};

use super::FetchError;

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    list_id: String,
    download: String,
    created_on: String,
    #[serde(default = "published")]
    available: bool,
}

fn published() -> bool {
    true
}

/// Decode a metadata document
///
/// `created_on` may carry a time part (`2023-10-17T00:00:00Z`); only the
/// calendar date is kept.
pub fn parse_metadata(body: &str, date: NaiveDate) -> Result<SnapshotMetadata, FetchError> {
    let response: MetadataResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode {
            reason: e.to_string(),
        })?;

    if !response.available {
        return Err(FetchError::NotAvailable { date });
    }
    if response.list_id.trim().is_empty() {
        return Err(FetchError::Decode {
            reason: "empty list_id".to_string(),
        });
    }
    if response.download.trim().is_empty() {
        return Err(FetchError::Decode {
            reason: "empty download url".to_string(),
        });
    }

    let day = response
        .created_on
        .get(..10)
        .ok_or_else(|| FetchError::Decode {
            reason: format!("created_on too short: {:?}", response.created_on),
        })?;
    let created_on =
        NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| FetchError::Decode {
            reason: format!("created_on {:?}: {}", response.created_on, e),
        })?;

    Ok(SnapshotMetadata::new(
        response.list_id,
        response.download,
        created_on,
    ))
}

/// Parse a headerless `rank,domain` list
///
/// Parsing is strict: a row without exactly two fields, a rank that is not
/// a positive integer or an empty domain fails the whole list. Blank lines
/// and `\r\n` endings are accepted.
pub fn parse_ranking_rows<R: BufRead>(reader: R) -> Result<Vec<RankingRow>, FetchError> {
    let mut rows = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => FetchError::MalformedRow {
                line: number,
                reason: "invalid UTF-8".to_string(),
            },
            _ => FetchError::Io(e),
        })?;
        let text = line.trim_end_matches('\r');
        let text = if number == 1 {
            text.trim_start_matches('\u{feff}')
        } else {
            text
        };
        if text.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(text, number)?);
    }

    Ok(rows)
}

fn parse_row(text: &str, line: usize) -> Result<RankingRow, FetchError> {
    let mut fields = text.split(',');
    let (Some(rank), Some(domain), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(FetchError::MalformedRow {
            line,
            reason: format!("expected 2 fields in {:?}", text),
        });
    };

    let rank: u32 = rank.trim().parse().map_err(|e| FetchError::MalformedRow {
        line,
        reason: format!("invalid rank {:?}: {}", rank, e),
    })?;
    if rank == 0 {
        return Err(FetchError::MalformedRow {
            line,
            reason: "rank must be positive".to_string(),
        });
    }

    let domain = domain.trim();
    if domain.is_empty() {
        return Err(FetchError::MalformedRow {
            line,
            reason: "empty domain".to_string(),
        });
    }

    Ok(RankingRow::new(rank, domain))
}
