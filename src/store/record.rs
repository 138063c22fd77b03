//! On-disk layout of one stored buffer.
//!
//! | Field | Encoding |
//! |---|---|
//! | primary | `count` x 8 bytes, IEEE-754 double, native byte order |
//! | intensity | `count` x 4 bytes, IEEE-754 single, native byte order |
//!
//! Records are concatenated in store order. Nothing in the file describes
//! them; the owning store's index is the only way to find one.

use crate::codec::{read_values_into, write_values, CodecError, Endianness, Precision};
use crate::points::{Coordinate, SortedPointBuffer};

/// Bytes per stored point
pub(crate) const POINT_RECORD_WIDTH: usize = 12;

/// Append the record for `primary`/`intensity` to `out`
pub(crate) fn encode_record(primary: &[f64], intensity: &[f32], out: &mut Vec<u8>) {
    write_values(primary, Precision::Float64, Endianness::NATIVE, out);
    write_values(intensity, Precision::Float32, Endianness::NATIVE, out);
}

/// Populate `buffer` from a record of `count` points.
///
/// The record was written from a sorted buffer, so the sortedness scan is
/// skipped.
pub(crate) fn decode_record<C: Coordinate>(
    bytes: &[u8],
    count: usize,
    buffer: &mut SortedPointBuffer<C>,
) -> Result<(), CodecError> {
    let expected = count * POINT_RECORD_WIDTH;
    if bytes.len() != expected {
        return Err(CodecError::InvalidLength {
            offset: expected.min(bytes.len()),
            expected,
            actual: bytes.len(),
        });
    }

    let (primary_bytes, intensity_bytes) = bytes.split_at(count * Precision::Float64.byte_size());
    let result = buffer.fill_sorted(count, |primary, intensity| {
        read_values_into(primary_bytes, Precision::Float64, Endianness::NATIVE, primary)?;
        read_values_into(intensity_bytes, Precision::Float32, Endianness::NATIVE, intensity)
    });
    if result.is_err() {
        buffer.clear();
    }
    result
}
