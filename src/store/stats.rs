use std::fmt;

/// Snapshot of a point store's bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Records currently retrievable
    pub records: usize,
    /// Points across all retrievable records
    pub points: u64,
    /// Records removed over the store's lifetime
    pub removed: usize,
    /// Bytes appended to the backing file (zero for the memory backend)
    pub bytes_written: u64,
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records ({} points), {} removed, {} bytes written",
            self.records, self.points, self.removed, self.bytes_written
        )
    }
}
