//! Handle bookkeeping shared by the store backends

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{StorageId, StoreError, StoreStats};

/// A record kept in a handle table
pub(crate) trait StoredRecord {
    /// Number of points the record holds
    fn point_count(&self) -> usize;
}

/// Maps storage ids to backend locations and tracks the disposed state.
///
/// Ids start at 1 and are never reused, even after removal or disposal.
#[derive(Debug)]
pub(crate) struct HandleTable<L> {
    next_id: i64,
    entries: HashMap<StorageId, L>,
    removed: usize,
    disposed: bool,
}

impl<L: StoredRecord> HandleTable<L> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 1,
            entries: HashMap::new(),
            removed: 0,
            disposed: false,
        }
    }

    /// Fail with `IllegalState` once the store has been disposed
    pub(crate) fn ensure_active(&self, operation: &str) -> Result<(), StoreError> {
        if self.disposed {
            Err(StoreError::IllegalState(format!(
                "cannot {} on a disposed point store",
                operation
            )))
        } else {
            Ok(())
        }
    }

    pub(crate) fn insert(&mut self, record: L) -> Result<StorageId, StoreError> {
        self.ensure_active("store")?;
        let id = StorageId::new(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, record);
        Ok(id)
    }

    pub(crate) fn get(&self, id: StorageId) -> Result<&L, StoreError> {
        self.ensure_active("read")?;
        self.entries.get(&id).ok_or(StoreError::NotFound(id))
    }

    pub(crate) fn remove(&mut self, id: StorageId) -> Result<L, StoreError> {
        self.ensure_active("remove")?;
        let record = self.entries.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.removed += 1;
        Ok(record)
    }

    pub(crate) fn contains(&self, id: StorageId) -> Result<bool, StoreError> {
        self.ensure_active("query")?;
        Ok(self.entries.contains_key(&id))
    }

    pub(crate) fn len(&self) -> Result<usize, StoreError> {
        self.ensure_active("query")?;
        Ok(self.entries.len())
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Clear the index and enter the terminal state.
    ///
    /// Returns false if the table was already disposed.
    pub(crate) fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.entries.clear();
        self.entries.shrink_to_fit();
        self.disposed = true;
        true
    }

    pub(crate) fn stats(&self, bytes_written: u64) -> StoreStats {
        StoreStats {
            records: self.entries.len(),
            points: self
                .entries
                .values()
                .map(|record| record.point_count() as u64)
                .sum(),
            removed: self.removed,
            bytes_written,
        }
    }
}

/// Lock a store's state, recovering from poisoning.
///
/// Every operation leaves the state consistent before any point where it can
/// panic, so a poisoned lock still guards valid data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
