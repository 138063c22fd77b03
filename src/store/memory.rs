use std::sync::Mutex;

use log::{debug, info, trace};

use super::table::{lock, HandleTable, StoredRecord};
use super::{DataPointStore, StorageId, StoreError, StoreStats};
use crate::points::{Coordinate, SortedPointBuffer};

/// Owned copy of a buffer's logical contents
#[derive(Debug, Clone)]
struct StoredPoints {
    primary: Vec<f64>,
    intensity: Vec<f32>,
}

impl StoredRecord for StoredPoints {
    fn point_count(&self) -> usize {
        self.primary.len()
    }
}

/// Point store that keeps a private clone of every stored buffer in memory.
///
/// All operations take one lock for their whole duration.
#[derive(Debug)]
pub struct MemoryDataPointStore {
    table: Mutex<HandleTable<StoredPoints>>,
}

impl MemoryDataPointStore {
    /// Create an empty store
    pub fn new() -> Self {
        debug!("Created in-memory point store");
        Self {
            table: Mutex::new(HandleTable::new()),
        }
    }
}

impl Default for MemoryDataPointStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPointStore for MemoryDataPointStore {
    fn store<C: Coordinate>(&self, buffer: &SortedPointBuffer<C>) -> Result<StorageId, StoreError> {
        let mut table = lock(&self.table);
        let id = table.insert(StoredPoints {
            primary: buffer.primary().to_vec(),
            intensity: buffer.intensity().to_vec(),
        })?;
        trace!("Stored {} points as record {}", buffer.len(), id);
        Ok(id)
    }

    fn read_into<C: Coordinate>(
        &self,
        id: StorageId,
        buffer: &mut SortedPointBuffer<C>,
    ) -> Result<(), StoreError> {
        let table = lock(&self.table);
        let points = table.get(id)?;
        buffer.fill_sorted(points.primary.len(), |primary, intensity| {
            primary.copy_from_slice(&points.primary);
            intensity.copy_from_slice(&points.intensity);
        });
        Ok(())
    }

    fn remove(&self, id: StorageId) -> Result<(), StoreError> {
        let mut table = lock(&self.table);
        let points = table.remove(id)?;
        trace!("Removed record {} ({} points)", id, points.point_count());
        Ok(())
    }

    fn contains(&self, id: StorageId) -> Result<bool, StoreError> {
        lock(&self.table).contains(id)
    }

    fn len(&self) -> Result<usize, StoreError> {
        lock(&self.table).len()
    }

    fn stats(&self) -> StoreStats {
        lock(&self.table).stats(0)
    }

    fn is_disposed(&self) -> bool {
        lock(&self.table).is_disposed()
    }

    fn dispose(&self) {
        let mut table = lock(&self.table);
        let stats = table.stats(0);
        if table.dispose() {
            info!("Disposed in-memory point store: {}", stats);
        }
    }
}
