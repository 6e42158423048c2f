//! Domain model for employee reviews.
//!
//! # Responsibility
//! - Define the records persisted by the repositories.
//! - Own attribute validation so every assignment path enforces it.
//!
//! # Invariants
//! - A `Review` value never holds an attribute that failed validation.
//! - Setters leave the previous value untouched when validation fails.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee;
pub mod review;

/// Attribute-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    YearBeforeMinimum { year: i64, minimum: i64 },
    EmptySummary,
    EmployeeNotFound(employee::EmployeeId),
    EmptyEmployeeName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YearBeforeMinimum { year, minimum } => {
                write!(f, "year must be {minimum} or greater, got {year}")
            }
            Self::EmptySummary => write!(f, "summary must be a non-empty string"),
            Self::EmployeeNotFound(id) => write!(f, "employee with id {id} does not exist"),
            Self::EmptyEmployeeName => write!(f, "employee name must be a non-empty string"),
        }
    }
}

impl Error for ValidationError {}
