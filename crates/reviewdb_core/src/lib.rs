//! Persistence core for employee reviews.
//! Owns the review schema, CRUD statements, validation rules and the
//! identity map that keeps one in-memory object per stored row.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::employee::{Employee, EmployeeId};
pub use model::review::{Review, ReviewHandle, ReviewId, MIN_REVIEW_YEAR};
pub use model::ValidationError;
pub use repo::employee_repo::{EmployeeLookup, SqliteEmployeeRepository};
pub use repo::identity_map::IdentityMap;
pub use repo::review_repo::{ReviewRow, ReviewStore};
pub use repo::{RepoError, RepoResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
