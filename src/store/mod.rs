//! # Data Point Storage
//!
//! A point store hands out integer [`StorageId`] handles for the contents of
//! [`SortedPointBuffer`]s and gives the contents back on request. Spectrum and
//! chromatogram objects keep only the handle.
//!
//! Two backends exist:
//!
//! - [`MemoryDataPointStore`]: keeps a private clone of each buffer.
//! - [`TmpFileDataPointStore`]: appends each buffer to a private, exclusively
//!   locked temp file and remembers `(offset, count)`.
//!
//! [`PointStore`] wraps either one and is what [`StoreConfig::open`] returns.
//!
//! ## Lifecycle
//!
//! A store is active until [`DataPointStore::dispose`] is called. After that
//! every operation fails with [`StoreError::IllegalState`]; disposing again is
//! a no-op. Ids are never reused.
//!
//! ## Concurrency
//!
//! Stores are `Send + Sync` and every operation runs under a single lock per
//! store, so calls from several importer threads are serialized even when
//! they touch unrelated ids.

mod config;
mod error;
mod memory;
mod record;
mod stats;
mod table;
mod tmpfile;

#[cfg(test)]
mod tests;

use std::fmt;
use std::path::Path;

pub use config::{StoreBackend, StoreConfig};
pub use error::StoreError;
pub use memory::MemoryDataPointStore;
pub use stats::StoreStats;
pub use tmpfile::TmpFileDataPointStore;

use crate::points::{Coordinate, SortedPointBuffer};

/// Opaque handle to a stored buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageId(i64);

impl StorageId {
    /// Wrap a raw handle value
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw handle value
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persists point buffers behind integer handles.
///
/// Records are opaque pairs of arrays: a buffer stored with one coordinate
/// system may be read back into another.
pub trait DataPointStore {
    /// Persist a snapshot of the buffer's contents and return its handle
    fn store<C: Coordinate>(&self, buffer: &SortedPointBuffer<C>) -> Result<StorageId, StoreError>;

    /// Read a record into a new buffer
    fn read<C: Coordinate>(&self, id: StorageId) -> Result<SortedPointBuffer<C>, StoreError> {
        let mut buffer = SortedPointBuffer::new();
        self.read_into(id, &mut buffer)?;
        Ok(buffer)
    }

    /// Replace `buffer`'s contents with a record, reusing its allocation
    fn read_into<C: Coordinate>(
        &self,
        id: StorageId,
        buffer: &mut SortedPointBuffer<C>,
    ) -> Result<(), StoreError>;

    /// Forget a record. Other handles are unaffected.
    fn remove(&self, id: StorageId) -> Result<(), StoreError>;

    /// Returns true if `id` refers to a retrievable record
    fn contains(&self, id: StorageId) -> Result<bool, StoreError>;

    /// Number of retrievable records
    fn len(&self) -> Result<usize, StoreError>;

    /// Returns true if no record is retrievable
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Current bookkeeping snapshot (still available after disposal)
    fn stats(&self) -> StoreStats;

    /// Returns true once [`dispose`](Self::dispose) has run
    fn is_disposed(&self) -> bool;

    /// Release every record and any backing resources. Idempotent.
    ///
    /// Cleanup failures are logged, never returned.
    fn dispose(&self);
}

/// A point store with its backend chosen at runtime
#[derive(Debug)]
pub enum PointStore {
    /// In-memory backend
    Memory(MemoryDataPointStore),
    /// Temp-file backend
    TmpFile(TmpFileDataPointStore),
}

impl PointStore {
    /// Path of the backing file, for the temp-file backend
    pub fn path(&self) -> Option<&Path> {
        match self {
            PointStore::Memory(_) => None,
            PointStore::TmpFile(store) => Some(store.path()),
        }
    }
}

impl DataPointStore for PointStore {
    fn store<C: Coordinate>(&self, buffer: &SortedPointBuffer<C>) -> Result<StorageId, StoreError> {
        match self {
            PointStore::Memory(store) => store.store(buffer),
            PointStore::TmpFile(store) => store.store(buffer),
        }
    }

    fn read_into<C: Coordinate>(
        &self,
        id: StorageId,
        buffer: &mut SortedPointBuffer<C>,
    ) -> Result<(), StoreError> {
        match self {
            PointStore::Memory(store) => store.read_into(id, buffer),
            PointStore::TmpFile(store) => store.read_into(id, buffer),
        }
    }

    fn remove(&self, id: StorageId) -> Result<(), StoreError> {
        match self {
            PointStore::Memory(store) => store.remove(id),
            PointStore::TmpFile(store) => store.remove(id),
        }
    }

    fn contains(&self, id: StorageId) -> Result<bool, StoreError> {
        match self {
            PointStore::Memory(store) => store.contains(id),
            PointStore::TmpFile(store) => store.contains(id),
        }
    }

    fn len(&self) -> Result<usize, StoreError> {
        match self {
            PointStore::Memory(store) => store.len(),
            PointStore::TmpFile(store) => store.len(),
        }
    }

    fn stats(&self) -> StoreStats {
        match self {
            PointStore::Memory(store) => store.stats(),
            PointStore::TmpFile(store) => store.stats(),
        }
    }

    fn is_disposed(&self) -> bool {
        match self {
            PointStore::Memory(store) => store.is_disposed(),
            PointStore::TmpFile(store) => store.is_disposed(),
        }
    }

    fn dispose(&self) {
        match self {
            PointStore::Memory(store) => store.dispose(),
            PointStore::TmpFile(store) => store.dispose(),
        }
    }
}
