//! Repository layer over SQLite.
//!
//! # Responsibility
//! - Keep SQL statements inside the core persistence boundary.
//! - Track persisted reviews through a store-owned identity map.
//!
//! # Invariants
//! - Writes validate attributes before any SQL runs.
//! - Repository APIs return semantic errors (`NotFound`, `Unsaved`) in
//!   addition to DB transport errors.
//! - Absence on lookup is `Ok(None)`, never an error.

use crate::db::DbError;
use crate::model::review::ReviewId;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee_repo;
pub mod identity_map;
pub mod review_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for review and employee persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(ReviewId),
    Unsaved,
    Busy,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "review not found: {id}"),
            Self::Unsaved => write!(f, "cannot update unsaved entity"),
            Self::Busy => write!(f, "review is borrowed elsewhere"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Unsaved | Self::Busy | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
