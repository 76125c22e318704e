//! Database connection management

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a connection waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(300);

/// Handle to a database file that hands out configured connections
///
/// Connections are not shared between threads; concurrent work opens one
/// connection per task from the same handle.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open and configure a new connection
    pub fn connect(&self) -> Result<Connection> {
        let conn = open(&self.path)?;
        configure(&conn)?;
        Ok(conn)
    }
}

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(from_rusqlite)?;
    configure(&conn)?;
    Ok(conn)
}

/// Configure a connection: busy timeout, foreign keys and WAL
pub fn configure(conn: &Connection) -> Result<()> {
    // Set first so the pragmas below wait on a locked file instead of failing
    conn.busy_timeout(BUSY_TIMEOUT).map_err(from_rusqlite)?;

    // journal_mode returns a row, which execute() rejects
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")
        .map_err(from_rusqlite)?;

    Ok(())
}
