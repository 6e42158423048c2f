//! Review domain model.
//!
//! # Responsibility
//! - Hold one employee review and validate every attribute assignment.
//! - Provide the shared handle type used by the identity map.
//!
//! # Invariants
//! - `year >= MIN_REVIEW_YEAR`.
//! - `summary` is not empty after trimming; it is stored as given.
//! - `employee_id` resolved through an `EmployeeLookup` when it was assigned.
//! - `id` is `None` until the store inserts the row, and only the store
//!   assigns it.

use super::employee::EmployeeId;
use super::ValidationError;
use crate::repo::employee_repo::EmployeeLookup;
use crate::repo::RepoResult;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type ReviewId = i64;

/// Shared identity of a review tracked by a `ReviewStore`.
///
/// Two handles for the same persisted row are always `Rc::ptr_eq`.
pub type ReviewHandle = Rc<RefCell<Review>>;

/// Earliest accepted review year.
pub const MIN_REVIEW_YEAR: i64 = 2000;

/// One yearly review of an employee.
///
/// Not `Clone`: a persisted review is shared through its `ReviewHandle`
/// rather than copied.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Review {
    id: Option<ReviewId>,
    year: i64,
    summary: String,
    employee_id: EmployeeId,
}

impl Review {
    /// Builds an unsaved review after validating all attributes.
    ///
    /// # Errors
    /// - `RepoError::Validation` for a bad year, blank summary, or unknown
    ///   employee.
    /// - `RepoError::Db` when the employee lookup itself fails.
    pub fn new<L>(
        year: i64,
        summary: impl Into<String>,
        employee_id: EmployeeId,
        employees: &L,
    ) -> RepoResult<Self>
    where
        L: EmployeeLookup + ?Sized,
    {
        Self::with_id(None, year, summary, employee_id, employees)
    }

    pub(crate) fn with_id<L>(
        id: Option<ReviewId>,
        year: i64,
        summary: impl Into<String>,
        employee_id: EmployeeId,
        employees: &L,
    ) -> RepoResult<Self>
    where
        L: EmployeeLookup + ?Sized,
    {
        let summary = summary.into();
        validate_year(year)?;
        validate_summary(&summary)?;
        ensure_employee_exists(employee_id, employees)?;

        Ok(Self {
            id,
            year,
            summary,
            employee_id,
        })
    }

    pub fn id(&self) -> Option<ReviewId> {
        self.id
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    /// Returns whether the review currently has a backing row.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    pub fn set_year(&mut self, year: i64) -> Result<(), ValidationError> {
        validate_year(year)?;
        self.year = year;
        Ok(())
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), ValidationError> {
        let summary = summary.into();
        validate_summary(&summary)?;
        self.summary = summary;
        Ok(())
    }

    /// Reassigns the reviewed employee.
    ///
    /// The lookup runs before the value changes, so an unknown id leaves the
    /// review untouched.
    pub fn set_employee_id<L>(&mut self, employee_id: EmployeeId, employees: &L) -> RepoResult<()>
    where
        L: EmployeeLookup + ?Sized,
    {
        ensure_employee_exists(employee_id, employees)?;
        self.employee_id = employee_id;
        Ok(())
    }

    /// Wraps the review into a shared handle accepted by the store.
    pub fn into_handle(self) -> ReviewHandle {
        Rc::new(RefCell::new(self))
    }

    pub(crate) fn assign_id(&mut self, id: Option<ReviewId>) {
        self.id = id;
    }

    /// Overwrites attributes with already validated values from `other`.
    pub(crate) fn copy_fields_from(&mut self, other: Review) {
        self.year = other.year;
        self.summary = other.summary;
        self.employee_id = other.employee_id;
    }
}

impl Display for Review {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = self
            .id
            .map_or_else(|| "None".to_string(), |id| id.to_string());
        write!(
            f,
            "<Review {id}: {}, {}, Employee: {}>",
            self.year, self.summary, self.employee_id
        )
    }
}

fn validate_year(year: i64) -> Result<(), ValidationError> {
    if year < MIN_REVIEW_YEAR {
        return Err(ValidationError::YearBeforeMinimum {
            year,
            minimum: MIN_REVIEW_YEAR,
        });
    }
    Ok(())
}

fn validate_summary(summary: &str) -> Result<(), ValidationError> {
    if summary.trim().is_empty() {
        return Err(ValidationError::EmptySummary);
    }
    Ok(())
}

fn ensure_employee_exists<L>(employee_id: EmployeeId, employees: &L) -> RepoResult<()>
where
    L: EmployeeLookup + ?Sized,
{
    if employees.find_employee(employee_id)?.is_none() {
        return Err(ValidationError::EmployeeNotFound(employee_id).into());
    }
    Ok(())
}
