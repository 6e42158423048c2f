//! Review store: schema, CRUD and identity tracking over `reviews`.
//!
//! # Responsibility
//! - Own the `reviews` DDL and the fixed CRUD statements.
//! - Hand out exactly one `ReviewHandle` per persisted row.
//!
//! # Invariants
//! - Every handle in the identity map has a non-null id equal to its key.
//! - A cache hit wins over row data (identity over freshness); `refresh`
//!   is the explicit reload.
//! - Each statement runs in autocommit mode and is durable on return.

use crate::model::employee::EmployeeId;
use crate::model::review::{Review, ReviewHandle, ReviewId};
use crate::repo::employee_repo::EmployeeLookup;
use crate::repo::identity_map::IdentityMap;
use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::cell::{Ref, RefMut};
use std::rc::Rc;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS reviews (
    id INTEGER PRIMARY KEY,
    year INT,
    summary TEXT,
    employee_id INTEGER,
    FOREIGN KEY (employee_id) REFERENCES employee(id)
)";

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS reviews;";

const REVIEW_SELECT_SQL: &str = "SELECT id, year, summary, employee_id FROM reviews";

/// Raw `reviews` row as read from SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub id: ReviewId,
    pub year: i64,
    pub summary: String,
    pub employee_id: EmployeeId,
}

/// Data-access object for reviews.
///
/// Borrows one connection and owns its identity map, so the cache lives
/// exactly as long as the store.
pub struct ReviewStore<'conn, L: EmployeeLookup> {
    conn: &'conn Connection,
    employees: L,
    identity_map: IdentityMap<Review>,
}

impl<'conn, L: EmployeeLookup> ReviewStore<'conn, L> {
    pub fn new(conn: &'conn Connection, employees: L) -> Self {
        Self {
            conn,
            employees,
            identity_map: IdentityMap::new(),
        }
    }

    /// Employee lookup used for validation; pass it to `Review` setters.
    pub fn employees(&self) -> &L {
        &self.employees
    }

    /// Creates the `reviews` table if it does not exist.
    pub fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(CREATE_TABLE_SQL)?;
        debug!("event=table_create module=repo status=ok table=reviews");
        Ok(())
    }

    /// Drops the `reviews` table if it exists.
    ///
    /// Tracked handles lose their rows, so they are detached and reset to
    /// unsaved.
    ///
    /// # Errors
    /// - `RepoError::Busy` when any tracked review is borrowed; nothing is
    ///   dropped in that case.
    pub fn drop_table(&mut self) -> RepoResult<()> {
        let tracked = self.identity_map.handles();
        let mut reviews = tracked
            .iter()
            .map(borrow_review_mut)
            .collect::<RepoResult<Vec<_>>>()?;

        self.conn.execute_batch(DROP_TABLE_SQL)?;
        for review in &mut reviews {
            review.assign_id(None);
        }
        drop(reviews);
        self.identity_map.clear();

        debug!(
            "event=table_drop module=repo status=ok table=reviews detached={}",
            tracked.len()
        );
        Ok(())
    }

    /// Builds an unsaved review validated against this store's employees.
    pub fn new_review(
        &self,
        year: i64,
        summary: impl Into<String>,
        employee_id: EmployeeId,
    ) -> RepoResult<Review> {
        Review::new(year, summary, employee_id, &self.employees)
    }

    /// Inserts an unsaved review or updates a saved one.
    ///
    /// The handle is (re-)registered in the identity map under its id in
    /// both cases.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when a saved review no longer has a row.
    /// - `RepoError::Busy` when the review is borrowed elsewhere.
    pub fn save(&mut self, review: &ReviewHandle) -> RepoResult<()> {
        let id = {
            let mut current = borrow_review_mut(review)?;
            match current.id() {
                Some(id) => {
                    self.execute_update(&current)?;
                    id
                }
                None => {
                    self.conn.execute(
                        "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3);",
                        params![current.year(), current.summary(), current.employee_id()],
                    )?;
                    let id = self.conn.last_insert_rowid();
                    current.assign_id(Some(id));
                    debug!("event=review_insert module=repo status=ok review_id={id}");
                    id
                }
            }
        };

        self.identity_map.insert(id, Rc::clone(review));
        Ok(())
    }

    /// Validates, inserts and returns a new tracked review.
    pub fn create(
        &mut self,
        year: i64,
        summary: impl Into<String>,
        employee_id: EmployeeId,
    ) -> RepoResult<ReviewHandle> {
        let handle = self.new_review(year, summary, employee_id)?.into_handle();
        self.save(&handle)?;
        Ok(handle)
    }

    /// Resolves a raw row to its tracked handle.
    ///
    /// On a cache hit the cached handle is returned unchanged, even if the
    /// row carries different values.
    pub fn instance_from_db(&mut self, row: ReviewRow) -> RepoResult<ReviewHandle> {
        if let Some(cached) = self.identity_map.get(row.id) {
            debug!(
                "event=review_load module=repo status=ok cache=hit review_id={}",
                row.id
            );
            return Ok(cached);
        }

        let id = row.id;
        let handle = Review::with_id(
            Some(id),
            row.year,
            row.summary,
            row.employee_id,
            &self.employees,
        )?
        .into_handle();
        self.identity_map.insert(id, Rc::clone(&handle));
        debug!("event=review_load module=repo status=ok cache=miss review_id={id}");
        Ok(handle)
    }

    /// Looks up a review by id. Absence is `Ok(None)`.
    pub fn find_by_id(&mut self, id: ReviewId) -> RepoResult<Option<ReviewHandle>> {
        match self.select_row(id)? {
            Some(row) => self.instance_from_db(row).map(Some),
            None => Ok(None),
        }
    }

    /// Writes the in-memory values of a saved review to its row.
    ///
    /// # Errors
    /// - `RepoError::Unsaved` when the review has never been saved.
    /// - `RepoError::NotFound` when its row is gone.
    /// - `RepoError::Busy` when the review is mutably borrowed elsewhere.
    pub fn update(&self, review: &ReviewHandle) -> RepoResult<()> {
        let current = borrow_review(review)?;
        self.execute_update(&current)
    }

    /// Deletes the row of a saved review and resets it to unsaved.
    ///
    /// Unsaved reviews are left as they are.
    pub fn delete(&mut self, review: &ReviewHandle) -> RepoResult<()> {
        let mut current = borrow_review_mut(review)?;
        let Some(id) = current.id() else {
            return Ok(());
        };

        let changed = self
            .conn
            .execute("DELETE FROM reviews WHERE id = ?1;", [id])?;
        self.identity_map.remove(id);
        current.assign_id(None);
        debug!("event=review_delete module=repo status=ok review_id={id} rows={changed}");
        Ok(())
    }

    /// Returns every review in id order, reusing tracked handles.
    pub fn get_all(&mut self) -> RepoResult<Vec<ReviewHandle>> {
        let conn = self.conn;
        let mut stmt = conn.prepare(&format!("{REVIEW_SELECT_SQL} ORDER BY id;"))?;
        let mut rows = stmt.query([])?;
        let mut parsed = Vec::new();
        while let Some(row) = rows.next()? {
            parsed.push(parse_review_row(row)?);
        }

        parsed
            .into_iter()
            .map(|row| self.instance_from_db(row))
            .collect()
    }

    /// Reloads a saved review from its row, overwriting in-memory values.
    ///
    /// If the row no longer exists the review is evicted, reset to unsaved
    /// and `RepoError::NotFound` is returned.
    pub fn refresh(&mut self, review: &ReviewHandle) -> RepoResult<()> {
        let mut current = borrow_review_mut(review)?;
        let id = current.id().ok_or(RepoError::Unsaved)?;

        let Some(row) = self.select_row(id)? else {
            self.identity_map.remove(id);
            current.assign_id(None);
            return Err(RepoError::NotFound(id));
        };

        let fresh = Review::with_id(
            Some(id),
            row.year,
            row.summary,
            row.employee_id,
            &self.employees,
        )?;
        current.copy_fields_from(fresh);
        self.identity_map.insert(id, Rc::clone(review));
        debug!("event=review_refresh module=repo status=ok review_id={id}");
        Ok(())
    }

    /// Tracked handle for `id`, without touching the database.
    pub fn cached(&self, id: ReviewId) -> Option<ReviewHandle> {
        self.identity_map.get(id)
    }

    /// Whether `id` currently has a tracked handle.
    pub fn is_cached(&self, id: ReviewId) -> bool {
        self.identity_map.contains(id)
    }

    /// Number of tracked reviews.
    pub fn cache_len(&self) -> usize {
        self.identity_map.len()
    }

    /// Tracked ids in ascending order.
    pub fn cached_ids(&self) -> Vec<ReviewId> {
        self.identity_map.ids()
    }

    /// Stops tracking `id`. The next load of that row builds a new handle.
    pub fn evict(&mut self, id: ReviewId) -> Option<ReviewHandle> {
        self.identity_map.remove(id)
    }

    /// Stops tracking every review.
    pub fn clear_cache(&mut self) {
        self.identity_map.clear();
    }

    fn select_row(&self, id: ReviewId) -> RepoResult<Option<ReviewRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_review_row(row)?));
        }
        Ok(None)
    }

    fn execute_update(&self, review: &Review) -> RepoResult<()> {
        let id = review.id().ok_or(RepoError::Unsaved)?;
        let changed = self.conn.execute(
            "UPDATE reviews
             SET year = ?1, summary = ?2, employee_id = ?3
             WHERE id = ?4;",
            params![review.year(), review.summary(), review.employee_id(), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=review_update module=repo status=ok review_id={id}");
        Ok(())
    }
}

fn borrow_review(review: &ReviewHandle) -> RepoResult<Ref<'_, Review>> {
    review.try_borrow().map_err(|_| RepoError::Busy)
}

fn borrow_review_mut(review: &ReviewHandle) -> RepoResult<RefMut<'_, Review>> {
    review.try_borrow_mut().map_err(|_| RepoError::Busy)
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<ReviewRow> {
    let id: ReviewId = row.get("id")?;
    let year = row
        .get::<_, Option<i64>>("year")?
        .ok_or_else(|| RepoError::InvalidData(format!("null year in reviews row {id}")))?;
    let summary = row
        .get::<_, Option<String>>("summary")?
        .ok_or_else(|| RepoError::InvalidData(format!("null summary in reviews row {id}")))?;
    let employee_id = row
        .get::<_, Option<EmployeeId>>("employee_id")?
        .ok_or_else(|| {
            RepoError::InvalidData(format!("null employee_id in reviews row {id}"))
        })?;

    Ok(ReviewRow {
        id,
        year,
        summary,
        employee_id,
    })
}
