//! Per-key lock map for single-writer-per-key discipline.
//!
//! Every mutating operation holds the lock for each (principal, bettor) key
//! it touches, so same-key operations serialize while unrelated keys run
//! freely. Batch operations acquire their guards in sorted key order, which
//! makes overlapping batches deadlock-free.
//!
//! Handles are never removed; the map grows with the set of keys ever
//! touched, like the consumed-bet set itself.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use mirrorbet_types::CopyKey;

/// Hands out one shared lock handle per (principal, bettor) key.
#[derive(Debug, Default)]
pub struct KeyLocks {
    inner: Mutex<HashMap<CopyKey, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Create an empty lock map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// The lock handle for a key, created on first use. Lock the returned
    /// handle to enter the key's critical section.
    #[must_use]
    pub fn handle(&self, key: CopyKey) -> Arc<Mutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(key).or_default())
    }

    /// Handles for a batch of keys, deduplicated and in sorted key order.
    /// Locking them in the returned order is deadlock-free against any
    /// other batch doing the same.
    #[must_use]
    pub fn handles_sorted(&self, keys: &[CopyKey]) -> Vec<Arc<Mutex<()>>> {
        let mut sorted: Vec<CopyKey> = keys.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.into_iter().map(|key| self.handle(key)).collect()
    }

    /// Number of keys ever locked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no key has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
