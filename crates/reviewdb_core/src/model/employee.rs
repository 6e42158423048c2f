//! Employee record referenced by reviews.
//!
//! Employees are a collaborator of the review store: reviews only need to
//! know that an employee row exists.

use serde::Serialize;

pub type EmployeeId = i64;

/// Persisted employee row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub job_title: String,
}
