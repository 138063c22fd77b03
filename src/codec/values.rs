//! Fixed-width conversion between numeric arrays and bytes

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::{CodecError, Endianness, Precision};

/// A numeric type a binary array can be decoded into.
///
/// Implemented for `f64` (coordinates) and `f32` (intensities). Decoding a
/// 32-bit array into `f64` widens exactly; decoding a 64-bit array into `f32`
/// rounds to nearest.
pub trait PeakValue: Copy + Default + Send + Sync + 'static {
    /// Convert from single precision
    fn from_f32(value: f32) -> Self;
    /// Convert from double precision
    fn from_f64(value: f64) -> Self;
    /// Convert to single precision
    fn to_f32(self) -> f32;
    /// Convert to double precision
    fn to_f64(self) -> f64;
}

impl PeakValue for f64 {
    #[inline]
    fn from_f32(value: f32) -> Self {
        value as f64
    }
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

impl PeakValue for f32 {
    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

fn read_with<B: ByteOrder, T: PeakValue>(bytes: &[u8], precision: Precision, out: &mut [T]) {
    match precision {
        Precision::Float32 => {
            for (chunk, slot) in bytes.chunks_exact(4).zip(out.iter_mut()) {
                *slot = T::from_f32(B::read_f32(chunk));
            }
        }
        Precision::Float64 => {
            for (chunk, slot) in bytes.chunks_exact(8).zip(out.iter_mut()) {
                *slot = T::from_f64(B::read_f64(chunk));
            }
        }
    }
}

fn write_with<B: ByteOrder, T: PeakValue>(values: &[T], precision: Precision, out: &mut Vec<u8>) {
    match precision {
        Precision::Float32 => {
            let mut buf = [0u8; 4];
            for value in values {
                B::write_f32(&mut buf, value.to_f32());
                out.extend_from_slice(&buf);
            }
        }
        Precision::Float64 => {
            let mut buf = [0u8; 8];
            for value in values {
                B::write_f64(&mut buf, value.to_f64());
                out.extend_from_slice(&buf);
            }
        }
    }
}

/// Decode `out.len()` fixed-width values from `bytes`.
///
/// # Errors
/// [`CodecError::InvalidLength`] unless `bytes` holds exactly
/// `out.len() * precision.byte_size()` bytes.
pub fn read_values_into<T: PeakValue>(
    bytes: &[u8],
    precision: Precision,
    endianness: Endianness,
    out: &mut [T],
) -> Result<(), CodecError> {
    let expected = out.len() * precision.byte_size();
    if bytes.len() != expected {
        return Err(CodecError::InvalidLength {
            offset: expected.min(bytes.len()),
            expected,
            actual: bytes.len(),
        });
    }

    match endianness {
        Endianness::Little => read_with::<LittleEndian, T>(bytes, precision, out),
        Endianness::Big => read_with::<BigEndian, T>(bytes, precision, out),
    }
    Ok(())
}

/// Append the fixed-width encoding of `values` to `out`
pub fn write_values<T: PeakValue>(
    values: &[T],
    precision: Precision,
    endianness: Endianness,
    out: &mut Vec<u8>,
) {
    out.reserve(values.len() * precision.byte_size());
    match endianness {
        Endianness::Little => write_with::<LittleEndian, T>(values, precision, out),
        Endianness::Big => write_with::<BigEndian, T>(values, precision, out),
    }
}
