//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Configure connection pragmas required by the review store.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections run in autocommit mode; every statement is durable
//!   once `execute` returns.

use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// How long a statement waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a SQLite database file.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory SQLite database.
///
/// Each call returns an independent database, which makes this the default
/// for tests.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with<F>(mode: &'static str, open: F) -> DbResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = open().and_then(|conn| {
        configure_connection(&conn)?;
        Ok(conn)
    });

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::open_db_in_memory;

    #[test]
    fn in_memory_connection_enforces_foreign_keys() {
        let conn = open_db_in_memory().expect("in-memory db should open");
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .expect("pragma should be readable");
        assert_eq!(enabled, 1);
    }

    #[test]
    fn in_memory_connections_are_independent() {
        let first = open_db_in_memory().expect("first db should open");
        first
            .execute_batch("CREATE TABLE marker (id INTEGER PRIMARY KEY);")
            .expect("create should succeed");

        let second = open_db_in_memory().expect("second db should open");
        let exists: i64 = second
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE name = 'marker');",
                [],
                |row| row.get(0),
            )
            .expect("sqlite_master should be queryable");
        assert_eq!(exists, 0);
    }
}
