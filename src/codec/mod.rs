//! # Binary Peak Codec
//!
//! mzML stores numerical arrays (m/z, retention time, intensity) as base64
//! text, optionally zlib-compressed, of little-endian 32- or 64-bit floats.
//! [`PeakCodec`] decodes that wire format into typed arrays and encodes typed
//! arrays back into it.
//!
//! Configuration is per array ([`CodecConfig`]); nothing is persisted. The
//! same fixed-width conversion ([`read_values_into`], [`write_values`]) backs
//! the on-disk record layout of the temp-file point store.

mod config;
mod decode;
mod encode;
mod error;
mod values;


pub use config::{CodecConfig, Compression, Endianness, Precision, TextEncoding};
pub use decode::PeakCodec;
pub use error::CodecError;
pub use values::{read_values_into, write_values, PeakValue};
