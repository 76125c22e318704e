//! Daily rank read projection: entries joined to their snapshot date

use crate::errors::{persistence, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use toprank_core::model::DailyRank;

pub struct DailyRankRepo;

impl DailyRankRepo {
    /// Ranks of `domain` on snapshots dated within `start..=end`, newest first
    pub fn ranks_in_range(
        conn: &Connection,
        domain: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRank>> {
        let mut stmt = conn
            .prepare_cached(
                "SELECT re.rank, rl.created_on
                 FROM ranking_entries re
                 INNER JOIN domains d ON re.domain_id = d.id
                 INNER JOIN ranking_lists rl ON re.list_id = rl.id
                 WHERE d.name = ?1
                   AND rl.created_on BETWEEN ?2 AND ?3
                 ORDER BY rl.created_on DESC",
            )
            .map_err(|e| persistence("daily_ranks", e))?;

        let ranks = stmt
            .query_map(rusqlite::params![domain, start, end], |row| {
                Ok(DailyRank {
                    rank: row.get(0)?,
                    date: row.get(1)?,
                })
            })
            .map_err(|e| persistence("daily_ranks", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| persistence("daily_ranks", e))?;

        Ok(ranks)
    }
}
