//! Coordinate systems for the primary axis of a point buffer.

use std::cmp::Ordering;
use std::fmt::Debug;

/// A coordinate system that a [`SortedPointBuffer`](super::SortedPointBuffer)
/// can be sorted along.
///
/// Implementors are zero-sized markers. The ordering decides what
/// "non-decreasing" means for the buffer's primary array.
pub trait Coordinate: Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// Short human-readable name used in log and error messages
    const NAME: &'static str;

    /// Compare two coordinate values.
    ///
    /// The default is IEEE-754 total ordering, so NaN sorts after every
    /// finite value instead of breaking the invariant.
    #[inline]
    fn compare(a: f64, b: f64) -> Ordering {
        a.total_cmp(&b)
    }

    /// Returns true if `a` may precede `b` in a sorted buffer
    #[inline]
    fn in_order(a: f64, b: f64) -> bool {
        Self::compare(a, b) != Ordering::Greater
    }
}

/// The mass-to-charge ratio (m/z) axis of a spectrum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mz;

impl Coordinate for Mz {
    const NAME: &'static str = "m/z";
}

/// The retention time axis of a chromatogram
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RetentionTime;

impl Coordinate for RetentionTime {
    const NAME: &'static str = "retention time";
}
