//! Mock implementation with essentially the same API as [`AvlTree`], but backed by a sorted vector
//!
//! [`AvlTree`]: crate::AvlTree

use crate::Insertion;
use std::mem;

/// A mock, inefficient implementation of the [`AvlTree`](crate::AvlTree) interface
///
/// Keys are ordered by their implementation of `Ord`, matching the default strategies.
#[derive(Debug, Clone)]
pub struct Mock<K, V> {
    // sorted by key, no duplicates
    entries: Vec<(K, V)>,
}

impl<K: Ord, V> Default for Mock<K, V> {
    fn default() -> Self {
        Mock::new()
    }
}

impl<K: Ord, V> Mock<K, V> {
    pub fn new() -> Self {
        Mock {
            entries: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn find(&self, key: &K) -> Option<&V> {
        let idx = self.search(key).ok()?;
        Some(&self.entries[idx].1)
    }

    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.search(key).ok()?;
        Some(&mut self.entries[idx].1)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    pub fn insert(&mut self, key: K, value: V, overwrite: bool) -> Insertion<'_, V> {
        match self.search(&key) {
            Err(idx) => {
                self.entries.insert(idx, (key, value));
                Insertion::Inserted
            }
            Ok(idx) if overwrite => Insertion::Replaced(mem::replace(&mut self.entries[idx].1, value)),
            Ok(idx) => Insertion::Rejected {
                existing: &mut self.entries[idx].1,
                value,
            },
        }
    }

    pub fn erase(&mut self, key: &K) -> Option<V> {
        let idx = self.search(key).ok()?;
        Some(self.entries.remove(idx).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns all of the keys, in order
    pub fn keys(&self) -> impl '_ + Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    fn search(&self, key: &K) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| k.cmp(key))
    }
}
