//! # Sorted Point Buffers
//!
//! Every spectrum and chromatogram is held in memory as a
//! [`SortedPointBuffer`]: two parallel arrays of primary coordinate (`f64`)
//! and intensity (`f32`), sorted by coordinate.
//!
//! The coordinate system is a type parameter. [`Mz`] buffers hold spectra,
//! [`RetentionTime`] buffers hold chromatograms; both share one
//! implementation.
//!
//! ## Mutation tiers
//!
//! - Safe API: [`SortedPointBuffer::add`] keeps the order on every insert and
//!   [`SortedPointBuffer::set_buffers`] validates caller arrays.
//! - Bulk API: [`SortedPointBuffer::bulk_update`] hands out mutable slices for
//!   a batch of unchecked writes and validates once at the end.

mod buffer;
mod coordinate;
mod error;


pub use buffer::{MzPointBuffer, RtPointBuffer, SortedPointBuffer, INITIAL_CAPACITY};
pub use coordinate::{Coordinate, Mz, RetentionTime};
pub use error::PointsError;
