use std::fs::{File, TryLockError};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, info, trace, warn};
use tempfile::NamedTempFile;

use super::record::{decode_record, encode_record, POINT_RECORD_WIDTH};
use super::table::{lock, HandleTable, StoredRecord};
use super::{DataPointStore, StorageId, StoreConfig, StoreError, StoreStats};
use crate::points::{Coordinate, PointsError, SortedPointBuffer};

/// Where a record lives in the backing file
#[derive(Debug, Clone, Copy)]
struct RecordLocation {
    offset: u64,
    count: u32,
}

impl StoredRecord for RecordLocation {
    fn point_count(&self) -> usize {
        self.count as usize
    }
}

#[derive(Debug)]
struct TmpFileState {
    table: HandleTable<RecordLocation>,
    /// `None` once disposed
    file: Option<NamedTempFile>,
    /// Encode/decode scratch space; grows, never shrinks
    scratch: Vec<u8>,
    /// Append position, equal to the bytes written so far
    end: u64,
}

/// Point store that appends every stored buffer to a private temp file.
///
/// The file is created exclusively, held under an OS advisory lock for the
/// store's whole life, and deleted by [`dispose`](DataPointStore::dispose).
/// Dropping an undisposed store performs the same cleanup and logs a warning;
/// owners should not rely on it.
///
/// Removing a record only forgets its location. The file grows monotonically
/// for as long as the store lives.
#[derive(Debug)]
pub struct TmpFileDataPointStore {
    state: Mutex<TmpFileState>,
    path: PathBuf,
}

impl TmpFileDataPointStore {
    /// Create a store backed by a new file in the OS temp directory
    pub fn new() -> Result<Self, StoreError> {
        Self::with_config(&StoreConfig::tmp_file())
    }

    /// Create a store backed by a new file inside `dir`
    pub fn new_in<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        Self::with_config(&StoreConfig::tmp_file().with_temp_dir(dir.as_ref()))
    }

    /// Create a store using the file settings of `config`.
    ///
    /// The backend selected in `config` is ignored.
    pub fn with_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&config.file_prefix).suffix(".tmp");
        let file = match &config.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        lock_exclusive(file.as_file())?;

        let path = file.path().to_path_buf();
        debug!("Created temp-file point store at {}", path.display());

        Ok(Self {
            state: Mutex::new(TmpFileState {
                table: HandleTable::new(),
                file: Some(file),
                scratch: Vec::with_capacity(config.scratch_capacity),
                end: 0,
            }),
            path,
        })
    }

    /// Path of the backing file (deleted once the store is disposed)
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn lock_exclusive(file: &File) -> io::Result<()> {
    match file.try_lock() {
        Ok(()) => Ok(()),
        Err(TryLockError::WouldBlock) => Err(io::Error::new(
            io::ErrorKind::WouldBlock,
            "point store file is locked by another process",
        )),
        Err(TryLockError::Error(e)) => Err(e),
    }
}

fn disposed_file() -> StoreError {
    StoreError::IllegalState("point store file has been released".to_string())
}

impl DataPointStore for TmpFileDataPointStore {
    fn store<C: Coordinate>(&self, buffer: &SortedPointBuffer<C>) -> Result<StorageId, StoreError> {
        let count = u32::try_from(buffer.len()).map_err(|_| {
            PointsError::InvalidArgument(format!(
                "{} points exceed the per-record limit of {}",
                buffer.len(),
                u32::MAX
            ))
        })?;

        let mut guard = lock(&self.state);
        guard.table.ensure_active("store")?;
        let state = &mut *guard;
        let file = state.file.as_mut().ok_or_else(disposed_file)?;

        state.scratch.clear();
        encode_record(buffer.primary(), buffer.intensity(), &mut state.scratch);
        let offset = state.end;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&state.scratch)?;
        state.end += state.scratch.len() as u64;

        let id = state.table.insert(RecordLocation { offset, count })?;
        trace!("Stored {} points as record {} at offset {}", count, id, offset);
        Ok(id)
    }

    fn read_into<C: Coordinate>(
        &self,
        id: StorageId,
        buffer: &mut SortedPointBuffer<C>,
    ) -> Result<(), StoreError> {
        let mut guard = lock(&self.state);
        let location = *guard.table.get(id)?;
        let state = &mut *guard;
        let file = state.file.as_mut().ok_or_else(disposed_file)?;

        let count = location.count as usize;
        let byte_len = count * POINT_RECORD_WIDTH;
        state.scratch.resize(byte_len, 0);
        file.seek(SeekFrom::Start(location.offset))?;
        file.read_exact(&mut state.scratch)?;

        decode_record(&state.scratch, count, buffer)?;
        Ok(())
    }

    fn remove(&self, id: StorageId) -> Result<(), StoreError> {
        let mut state = lock(&self.state);
        let location = state.table.remove(id)?;
        // The record's bytes stay in the file. Long-lived stores with heavy
        // churn would need a freelist or a compaction pass here.
        trace!(
            "Removed record {} ({} bytes left at offset {})",
            id,
            location.point_count() * POINT_RECORD_WIDTH,
            location.offset
        );
        Ok(())
    }

    fn contains(&self, id: StorageId) -> Result<bool, StoreError> {
        lock(&self.state).table.contains(id)
    }

    fn len(&self) -> Result<usize, StoreError> {
        lock(&self.state).table.len()
    }

    fn stats(&self) -> StoreStats {
        let state = lock(&self.state);
        state.table.stats(state.end)
    }

    fn is_disposed(&self) -> bool {
        lock(&self.state).table.is_disposed()
    }

    fn dispose(&self) {
        let mut state = lock(&self.state);
        let stats = state.table.stats(state.end);
        if !state.table.dispose() {
            return;
        }
        state.scratch = Vec::new();
        if let Some(file) = state.file.take() {
            release(file);
        }
        info!(
            "Disposed temp-file point store {}: {}",
            self.path.display(),
            stats
        );
    }
}

/// Unlock and delete the backing file, logging failures
fn release(file: NamedTempFile) {
    if let Err(e) = file.as_file().unlock() {
        warn!(
            "Failed to unlock point store file {}: {}",
            file.path().display(),
            e
        );
    }
    let path = file.path().to_path_buf();
    if let Err(e) = file.close() {
        warn!(
            "Failed to delete point store file {}: {}",
            path.display(),
            e
        );
    }
}

impl Drop for TmpFileDataPointStore {
    fn drop(&mut self) {
        let undisposed = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .file
            .is_some();
        if undisposed {
            warn!(
                "Point store {} dropped without dispose; cleaning up",
                self.path.display()
            );
            self.dispose();
        }
    }
}
