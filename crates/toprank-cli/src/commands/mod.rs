pub mod ingest;
pub mod prune;

use std::path::Path;

use toprank_core::errors::{RankError, RankErrorKind, Result};
use toprank_store::migrations::apply_migrations;
use toprank_store::Database;

/// Open the database, creating its directory and schema when missing
pub fn open_database(path: &Path) -> Result<Database> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            RankError::new(RankErrorKind::Persistence)
                .with_op("create_database_dir")
                .with_message(format!("{}: {}", parent.display(), e))
        })?;
    }

    let db = Database::new(path);
    let mut conn = db.connect()?;
    apply_migrations(&mut conn)?;
    Ok(db)
}
