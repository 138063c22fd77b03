use std::io::Write;

use base64::prelude::*;
use flate2::write::ZlibEncoder;
use flate2::Compression as ZlibLevel;

use super::values::write_values;
use super::{CodecConfig, CodecError, Compression, PeakCodec, PeakValue, TextEncoding};

impl PeakCodec {
    /// Encode an array with the given configuration.
    ///
    /// Output is deterministic: the same values and configuration always
    /// produce the same bytes. `expected_count` and `encoded_length` are
    /// ignored.
    pub fn encode<T: PeakValue>(values: &[T], config: &CodecConfig) -> Result<Vec<u8>, CodecError> {
        let packed = Self::pack(values, config)?;
        Ok(match config.text {
            TextEncoding::Raw => packed,
            TextEncoding::Base64 => BASE64_STANDARD.encode(&packed).into_bytes(),
        })
    }

    /// Encode an array as base64 text for an mzML `<binary>` element,
    /// whatever the configured text layer
    pub fn encode_to_string<T: PeakValue>(
        values: &[T],
        config: &CodecConfig,
    ) -> Result<String, CodecError> {
        let packed = Self::pack(values, config)?;
        Ok(BASE64_STANDARD.encode(&packed))
    }

    /// Fixed-width payload, compressed if configured
    fn pack<T: PeakValue>(values: &[T], config: &CodecConfig) -> Result<Vec<u8>, CodecError> {
        let mut payload = Vec::new();
        write_values(values, config.precision, config.endianness, &mut payload);
        match config.compression {
            Compression::None => Ok(payload),
            Compression::Zlib => deflate(&payload),
        }
    }
}

fn deflate(payload: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(payload.len() / 2 + 16), ZlibLevel::default());
    encoder
        .write_all(payload)
        .and_then(|_| encoder.finish())
        .map_err(|source| CodecError::Io { offset: 0, source })
}
