//! Employee lookup port and its SQLite implementation.
//!
//! # Responsibility
//! - Define the capability reviews use to check that an employee exists.
//! - Persist employees in the `employee` table referenced by `reviews`.
//!
//! # Invariants
//! - `find_employee` reports absence as `Ok(None)`.
//! - Read paths reject rows with a null or blank name.

use crate::model::employee::{Employee, EmployeeId};
use crate::model::ValidationError;
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS employee (
    id INTEGER PRIMARY KEY,
    name TEXT,
    job_title TEXT
)";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS employee;";

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, name, job_title FROM employee";

/// Existence check for employees, injected into review validation.
pub trait EmployeeLookup {
    fn find_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
}

impl<T: EmployeeLookup + ?Sized> EmployeeLookup for &T {
    fn find_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        (**self).find_employee(id)
    }
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(CREATE_TABLE_SQL)?;
        debug!("event=table_create module=repo status=ok table=employee");
        Ok(())
    }

    pub fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(DROP_TABLE_SQL)?;
        debug!("event=table_drop module=repo status=ok table=employee");
        Ok(())
    }

    /// Inserts a new employee and returns the stored row.
    pub fn create(&self, name: &str, job_title: &str) -> RepoResult<Employee> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyEmployeeName.into());
        }

        self.conn.execute(
            "INSERT INTO employee (name, job_title) VALUES (?1, ?2);",
            params![name, job_title],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("event=employee_insert module=repo status=ok employee_id={id}");

        Ok(Employee {
            id,
            name: name.to_string(),
            job_title: job_title.to_string(),
        })
    }

    pub fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    pub fn get_all(&self) -> RepoResult<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id;"))?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }
}

impl EmployeeLookup for SqliteEmployeeRepository<'_> {
    fn find_employee(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.find_by_id(id)
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let id: EmployeeId = row.get("id")?;
    let name = row
        .get::<_, Option<String>>("name")?
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| {
            RepoError::InvalidData(format!("null or blank name in employee row {id}"))
        })?;

    Ok(Employee {
        id,
        name,
        job_title: row.get::<_, Option<String>>("job_title")?.unwrap_or_default(),
    })
}
