use super::StorageId;
use crate::codec::CodecError;
use crate::points::PointsError;

/// Errors that can occur during point store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record exists for the handle, usually a use-after-remove
    #[error("Storage id {0} not found")]
    NotFound(StorageId),

    /// Operation attempted on a disposed store
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// I/O failure in the backing file (disk full, permissions, lock contention)
    #[error("Storage I/O error: {0}")]
    Storage(#[from] std::io::Error),

    /// A stored record could not be decoded
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// A buffer could not be stored or populated
    #[error("Point buffer error: {0}")]
    Points(#[from] PointsError),

    /// Invalid or unreadable store configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
