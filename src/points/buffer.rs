use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Bound, RangeBounds, RangeInclusive};

use super::{Coordinate, Mz, PointsError, RetentionTime};

/// Capacity used by the first growth of an empty buffer
pub const INITIAL_CAPACITY: usize = 16;

/// Growable (coordinate, intensity) arrays kept sorted by coordinate.
///
/// The two backing arrays always have the same physical length, which is the
/// buffer's capacity. Only the first [`len`](Self::len) elements are
/// meaningful, and within them the primary coordinate is non-decreasing
/// according to `C`.
///
/// A buffer is meant to be owned by one thread at a time: either a scratch
/// object reused by an importer, or a fresh value returned by a store read.
#[derive(Clone)]
pub struct SortedPointBuffer<C: Coordinate = Mz> {
    primary: Vec<f64>,
    intensity: Vec<f32>,
    size: usize,
    coordinate: PhantomData<C>,
}

/// A spectrum: intensities sorted by m/z
pub type MzPointBuffer = SortedPointBuffer<Mz>;

/// A chromatogram: intensities sorted by retention time
pub type RtPointBuffer = SortedPointBuffer<RetentionTime>;

/// Index of the first element that breaks the non-decreasing order, if any
fn first_unsorted<C: Coordinate>(values: &[f64]) -> Option<usize> {
    values
        .windows(2)
        .position(|pair| !C::in_order(pair[0], pair[1]))
        .map(|i| i + 1)
}

impl<C: Coordinate> SortedPointBuffer<C> {
    /// Create an empty buffer without allocating
    pub fn new() -> Self {
        Self {
            primary: Vec::new(),
            intensity: Vec::new(),
            size: 0,
            coordinate: PhantomData,
        }
    }

    /// Create an empty buffer with room for `capacity` points
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Self::new();
        buffer.allocate(capacity);
        buffer
    }

    /// Build a buffer from two arrays of equal length, validating sort order.
    pub fn from_arrays(primary: Vec<f64>, intensity: Vec<f32>) -> Result<Self, PointsError> {
        if primary.len() != intensity.len() {
            return Err(PointsError::InvalidArgument(format!(
                "{} array has {} values but intensity array has {}",
                C::NAME,
                primary.len(),
                intensity.len()
            )));
        }
        let size = primary.len();
        let mut buffer = Self::new();
        buffer.set_buffers(primary, intensity, size)?;
        Ok(buffer)
    }

    /// Number of points in the buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the buffer holds no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Physical length of the backing arrays
    #[inline]
    pub fn capacity(&self) -> usize {
        self.primary.len()
    }

    /// The sorted primary coordinates
    #[inline]
    pub fn primary(&self) -> &[f64] {
        &self.primary[..self.size]
    }

    /// The intensities, parallel to [`primary`](Self::primary)
    #[inline]
    pub fn intensity(&self) -> &[f32] {
        &self.intensity[..self.size]
    }

    /// The point at `index`, if it exists
    pub fn get(&self, index: usize) -> Option<(f64, f32)> {
        if index < self.size {
            Some((self.primary[index], self.intensity[index]))
        } else {
            None
        }
    }

    /// Iterate over `(primary, intensity)` pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f32)> + '_ {
        self.primary()
            .iter()
            .copied()
            .zip(self.intensity().iter().copied())
    }

    /// Grow both backing arrays to at least `new_capacity`.
    ///
    /// Existing points are preserved. Never shrinks.
    pub fn allocate(&mut self, new_capacity: usize) {
        if new_capacity <= self.capacity() {
            return;
        }
        self.primary.resize(new_capacity, 0.0);
        self.intensity.resize(new_capacity, 0.0);
    }

    /// Insert a point, keeping the buffer sorted.
    ///
    /// Appending in coordinate order is O(1) amortized. An out-of-order point
    /// is placed after any existing points with an equal coordinate and the
    /// tail is shifted up by one.
    pub fn add(&mut self, primary: f64, intensity: f32) {
        if self.size == self.capacity() {
            let grown = match self.capacity() {
                0 => INITIAL_CAPACITY,
                capacity => capacity * 2,
            };
            self.allocate(grown);
        }

        let end = self.size;
        if end == 0 || C::in_order(self.primary[end - 1], primary) {
            self.primary[end] = primary;
            self.intensity[end] = intensity;
        } else {
            let at = self.primary[..end].partition_point(|&p| C::in_order(p, primary));
            self.primary.copy_within(at..end, at + 1);
            self.intensity.copy_within(at..end, at + 1);
            self.primary[at] = primary;
            self.intensity[at] = intensity;
        }
        self.size += 1;
    }

    /// Take ownership of caller-supplied arrays without copying them.
    ///
    /// The first `new_size` elements become the buffer's contents. The whole
    /// prefix is scanned for sort order. If the arrays differ in length the
    /// shorter one is padded so both have the same capacity.
    ///
    /// # Errors
    /// - [`PointsError::InvalidArgument`] if `new_size` exceeds either array
    /// - [`PointsError::InvalidState`] if the primary prefix is not sorted
    pub fn set_buffers(
        &mut self,
        mut primary: Vec<f64>,
        mut intensity: Vec<f32>,
        new_size: usize,
    ) -> Result<(), PointsError> {
        if new_size > primary.len() || new_size > intensity.len() {
            return Err(PointsError::InvalidArgument(format!(
                "size {} exceeds array lengths ({} {}, {} intensity)",
                new_size,
                primary.len(),
                C::NAME,
                intensity.len()
            )));
        }
        if let Some(index) = first_unsorted::<C>(&primary[..new_size]) {
            return Err(PointsError::InvalidState(format!(
                "{} values are not sorted at index {}",
                C::NAME,
                index
            )));
        }

        let capacity = primary.len().max(intensity.len());
        primary.resize(capacity, 0.0);
        intensity.resize(capacity, 0.0);
        self.primary = primary;
        self.intensity = intensity;
        self.size = new_size;
        Ok(())
    }

    /// Apply a batch of unchecked writes, then re-validate once.
    ///
    /// The closure receives mutable slices of length `new_size`. Slots beyond
    /// the previous length hold unspecified values and must be written by the
    /// closure. If the primary slice is not sorted afterwards the buffer is
    /// cleared and [`PointsError::InvalidState`] is returned.
    pub fn bulk_update<F, R>(&mut self, new_size: usize, update: F) -> Result<R, PointsError>
    where
        F: FnOnce(&mut [f64], &mut [f32]) -> R,
    {
        self.allocate(new_size);
        let result = update(
            &mut self.primary[..new_size],
            &mut self.intensity[..new_size],
        );
        if let Some(index) = first_unsorted::<C>(&self.primary[..new_size]) {
            self.size = 0;
            return Err(PointsError::InvalidState(format!(
                "bulk update left {} values unsorted at index {}",
                C::NAME,
                index
            )));
        }
        self.size = new_size;
        Ok(result)
    }

    /// Fill the buffer from a source already known to be sorted.
    ///
    /// Skips the sortedness scan in release builds; only storage backends that
    /// wrote the data themselves should use this.
    pub(crate) fn fill_sorted<F, R>(&mut self, new_size: usize, fill: F) -> R
    where
        F: FnOnce(&mut [f64], &mut [f32]) -> R,
    {
        self.allocate(new_size);
        let result = fill(
            &mut self.primary[..new_size],
            &mut self.intensity[..new_size],
        );
        debug_assert!(first_unsorted::<C>(&self.primary[..new_size]).is_none());
        self.size = new_size;
        result
    }

    /// Drop all points, keeping the allocated capacity
    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Replace this buffer's contents with a deep copy of `other`'s.
    pub fn copy_from(&mut self, other: &Self) {
        let size = other.size;
        self.allocate(size);
        self.primary[..size].copy_from_slice(other.primary());
        self.intensity[..size].copy_from_slice(other.intensity());
        self.size = size;
    }

    /// Points whose coordinate and intensity both fall inside the given bounds.
    ///
    /// Coordinate bounds are located by binary search; intensities are then
    /// filtered linearly. The result is sorted.
    ///
    /// Coordinate bounds follow the coordinate's total ordering, in which
    /// `-0.0` precedes `0.0`: `select(0.0..=1.0, ..)` leaves out a point at
    /// `-0.0`. Intensity bounds use ordinary float comparison.
    pub fn select<P, I>(&self, primary_range: P, intensity_range: I) -> Self
    where
        P: RangeBounds<f64>,
        I: RangeBounds<f32>,
    {
        let primary = self.primary();
        let start = match primary_range.start_bound() {
            Bound::Included(&low) => {
                primary.partition_point(|&p| C::compare(p, low) == Ordering::Less)
            }
            Bound::Excluded(&low) => primary.partition_point(|&p| C::in_order(p, low)),
            Bound::Unbounded => 0,
        };
        let end = match primary_range.end_bound() {
            Bound::Included(&high) => primary.partition_point(|&p| C::in_order(p, high)),
            Bound::Excluded(&high) => {
                primary.partition_point(|&p| C::compare(p, high) == Ordering::Less)
            }
            Bound::Unbounded => primary.len(),
        };

        let mut selected = Self::new();
        if start >= end {
            return selected;
        }

        let (mz, intensity): (Vec<f64>, Vec<f32>) = (start..end)
            .filter(|&i| intensity_range.contains(&self.intensity[i]))
            .map(|i| (self.primary[i], self.intensity[i]))
            .unzip();
        selected.size = mz.len();
        selected.primary = mz;
        selected.intensity = intensity;
        selected
    }

    /// Closed coordinate range covered by the buffer, or `None` when empty
    pub fn range(&self) -> Option<RangeInclusive<f64>> {
        if self.size == 0 {
            None
        } else {
            Some(self.primary[0]..=self.primary[self.size - 1])
        }
    }

    /// Sum of all intensities (TIC), accumulated in double precision
    pub fn total_intensity(&self) -> f64 {
        self.intensity().iter().map(|&i| i as f64).sum()
    }

    /// The most intense point; the first one wins on ties
    pub fn base_peak(&self) -> Option<(f64, f32)> {
        let mut best: Option<(f64, f32)> = None;
        for (primary, intensity) in self.iter() {
            match best {
                Some((_, top)) if intensity <= top => {}
                _ => best = Some((primary, intensity)),
            }
        }
        best
    }

    /// Consume the buffer, returning its logical arrays
    pub fn into_arrays(mut self) -> (Vec<f64>, Vec<f32>) {
        self.primary.truncate(self.size);
        self.intensity.truncate(self.size);
        (self.primary, self.intensity)
    }
}

impl<C: Coordinate> Default for SortedPointBuffer<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Logical contents compared under the coordinate's ordering, so a buffer
/// holding NaN equals its own copy. Intensities compare bit for bit.
impl<C: Coordinate> PartialEq for SortedPointBuffer<C> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .primary()
                .iter()
                .zip(other.primary())
                .all(|(&a, &b)| C::compare(a, b) == Ordering::Equal)
            && self
                .intensity()
                .iter()
                .zip(other.intensity())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl<C: Coordinate> fmt::Debug for SortedPointBuffer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedPointBuffer")
            .field("coordinate", &C::NAME)
            .field("primary", &self.primary())
            .field("intensity", &self.intensity())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<C: Coordinate> Extend<(f64, f32)> for SortedPointBuffer<C> {
    fn extend<T: IntoIterator<Item = (f64, f32)>>(&mut self, iter: T) {
        for (primary, intensity) in iter {
            self.add(primary, intensity);
        }
    }
}

impl<C: Coordinate> FromIterator<(f64, f32)> for SortedPointBuffer<C> {
    fn from_iter<T: IntoIterator<Item = (f64, f32)>>(iter: T) -> Self {
        let mut buffer = Self::new();
        buffer.extend(iter);
        buffer
    }
}
