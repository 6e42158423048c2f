//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire `reviewdb_core` against a file or in-memory database.
//! - Print every stored review as one JSON object per line.
//!
//! Usage: `reviewdb_cli [DB_PATH]`. Without a path an in-memory database is
//! seeded with a sample employee and review. `REVIEWDB_LOG_DIR` (absolute)
//! enables file logging at `REVIEWDB_LOG_LEVEL` or the build default.

use log::info;
use reviewdb_core::{
    default_log_level, init_logging, open_db, open_db_in_memory, ReviewStore,
    SqliteEmployeeRepository,
};
use std::error::Error;

const LOG_DIR_ENV: &str = "REVIEWDB_LOG_DIR";
const LOG_LEVEL_ENV: &str = "REVIEWDB_LOG_LEVEL";

fn main() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().into());
        init_logging(&level, &log_dir)?;
    }

    let db_path = std::env::args().nth(1);
    let conn = match &db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    let employees = SqliteEmployeeRepository::new(&conn);
    employees.create_table()?;
    let mut store = ReviewStore::new(&conn, &employees);
    store.create_table()?;

    if db_path.is_none() {
        let employee = employees.create("Sample Employee", "Engineer")?;
        store.create(2023, "Great work", employee.id)?;
    }

    let reviews = store.get_all()?;
    info!(
        "event=cli_list module=cli status=ok reviews={}",
        reviews.len()
    );
    for review in &reviews {
        println!("{}", serde_json::to_string(&*review.borrow())?);
    }
    Ok(())
}
