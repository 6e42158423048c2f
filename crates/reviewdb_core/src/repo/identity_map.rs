//! Identity map keyed by primary key.
//!
//! Holds the single shared handle for every persisted row a store has seen.
//! The map is owned by its store; dropping the store drops the cache.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Mapping from primary key to the one in-memory object for that row.
#[derive(Debug)]
pub struct IdentityMap<T> {
    entries: HashMap<i64, Rc<RefCell<T>>>,
}

impl<T> Default for IdentityMap<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> IdentityMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the tracked handle for `id`, if any.
    pub fn get(&self, id: i64) -> Option<Rc<RefCell<T>>> {
        self.entries.get(&id).cloned()
    }

    /// Registers `handle` under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: i64, handle: Rc<RefCell<T>>) {
        self.entries.insert(id, handle);
    }

    pub fn remove(&mut self, id: i64) -> Option<Rc<RefCell<T>>> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Clones of every tracked handle, in no particular order.
    pub fn handles(&self) -> Vec<Rc<RefCell<T>>> {
        self.entries.values().cloned().collect()
    }

    /// Tracked ids in ascending order.
    pub fn ids(&self) -> Vec<i64> {
        let mut ids = self.entries.keys().copied().collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }
}
