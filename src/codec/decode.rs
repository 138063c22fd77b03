use std::borrow::Cow;
use std::io::{self, Read};

use base64::prelude::*;
use flate2::{Decompress, FlushDecompress, Status};

use super::values::read_values_into;
use super::{CodecConfig, CodecError, Compression, PeakValue, TextEncoding};
use crate::points::{Coordinate, SortedPointBuffer};

/// Smallest output buffer used when inflating
const MIN_INFLATE_CAPACITY: usize = 256;

/// Upper bound on the initial output buffer, as a multiple of the input size
const MAX_INFLATE_RATIO: usize = 8;

/// Decoder and encoder for binary peak arrays.
///
/// The decoding pipeline is:
///
/// 1. Base64 decode the text (whitespace is skipped)
/// 2. Inflate if the payload is zlib-compressed
/// 3. Interpret bytes as 32- or 64-bit floats in the configured byte order
///
/// Decoded arrays are returned as-is: no sorting and no monotonicity check.
pub struct PeakCodec;

impl PeakCodec {
    /// Decode an array held in memory.
    ///
    /// # Errors
    /// Any [`CodecError`] describing malformed base64, a corrupt or truncated
    /// deflate stream, or a payload whose size is not
    /// `expected_count * width`.
    pub fn decode<T: PeakValue>(data: &[u8], config: &CodecConfig) -> Result<Vec<T>, CodecError> {
        let data = match config.encoded_length {
            Some(limit) if limit < data.len() => &data[..limit],
            _ => data,
        };

        let raw: Cow<'_, [u8]> = match config.text {
            TextEncoding::Raw => Cow::Borrowed(data),
            TextEncoding::Base64 => Cow::Owned(decode_base64(data)?),
        };
        Self::unpack(&raw, config)
    }

    /// Decode the text content of an mzML `<binary>` element
    pub fn decode_str<T: PeakValue>(text: &str, config: &CodecConfig) -> Result<Vec<T>, CodecError> {
        Self::decode(text.as_bytes(), config)
    }

    /// Decode an array from a stream.
    ///
    /// Base64 text is decoded incrementally as it is read; the text itself is
    /// never buffered. At most `config.encoded_length` bytes are consumed.
    pub fn decode_reader<T: PeakValue, R: Read>(
        reader: R,
        config: &CodecConfig,
    ) -> Result<Vec<T>, CodecError> {
        let limit = config.encoded_length.map_or(u64::MAX, |n| n as u64);
        let mut source = CountingReader::new(reader.take(limit));
        let mut raw = Vec::new();

        match config.text {
            TextEncoding::Raw => {
                source
                    .read_to_end(&mut raw)
                    .map_err(|e| stream_error(e, source.count, 0))?;
            }
            TextEncoding::Base64 => {
                let text = SkipWhitespace::new(&mut source);
                let mut decoder = base64::read::DecoderReader::new(text, &BASE64_STANDARD);
                let result = decoder.read_to_end(&mut raw);
                let passed = decoder.into_inner().passed;
                result.map_err(|e| stream_error(e, source.count, passed))?;
            }
        }

        Self::unpack(&raw, config)
    }

    /// Decode a coordinate array and its intensity array together.
    ///
    /// # Errors
    /// [`CodecError::LengthMismatch`] if the two arrays differ in length, in
    /// addition to any decoding error.
    pub fn decode_pair(
        primary: &[u8],
        primary_config: &CodecConfig,
        intensity: &[u8],
        intensity_config: &CodecConfig,
    ) -> Result<(Vec<f64>, Vec<f32>), CodecError> {
        let primary: Vec<f64> = Self::decode(primary, primary_config)?;
        let intensity: Vec<f32> = Self::decode(intensity, intensity_config)?;
        if primary.len() != intensity.len() {
            return Err(CodecError::LengthMismatch {
                primary: primary.len(),
                intensity: intensity.len(),
            });
        }
        Ok((primary, intensity))
    }

    /// Decode an array pair straight into a point buffer.
    ///
    /// The decoded arrays are handed over without copying; the coordinate
    /// array must already be sorted.
    pub fn decode_into_buffer<C: Coordinate>(
        buffer: &mut SortedPointBuffer<C>,
        primary: &[u8],
        primary_config: &CodecConfig,
        intensity: &[u8],
        intensity_config: &CodecConfig,
    ) -> Result<(), CodecError> {
        let (primary, intensity) =
            Self::decode_pair(primary, primary_config, intensity, intensity_config)?;
        let size = primary.len();
        buffer.set_buffers(primary, intensity, size)?;
        Ok(())
    }

    /// Inflate (if needed) and convert a decoded binary payload
    fn unpack<T: PeakValue>(raw: &[u8], config: &CodecConfig) -> Result<Vec<T>, CodecError> {
        // Writers emit an empty <binary/> for zero-length arrays regardless of compression
        if raw.is_empty() && config.expected_count == 0 {
            return Ok(Vec::new());
        }

        let expected = config
            .expected_count
            .checked_mul(config.precision.byte_size());
        let payload: Cow<'_, [u8]> = match config.compression {
            Compression::None => Cow::Borrowed(raw),
            Compression::Zlib => Cow::Owned(inflate(raw, config.payload_len())?),
        };

        // Validate the size before allocating `expected_count` values
        if expected != Some(payload.len()) {
            let expected = expected.unwrap_or(usize::MAX);
            return Err(CodecError::InvalidLength {
                offset: expected.min(payload.len()),
                expected,
                actual: payload.len(),
            });
        }

        let mut values = vec![T::default(); config.expected_count];
        read_values_into(&payload, config.precision, config.endianness, &mut values)?;
        Ok(values)
    }
}

fn decode_base64(text: &[u8]) -> Result<Vec<u8>, CodecError> {
    let text: Cow<'_, [u8]> = if text.iter().any(u8::is_ascii_whitespace) {
        Cow::Owned(
            text.iter()
                .copied()
                .filter(|b| !b.is_ascii_whitespace())
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    };

    BASE64_STANDARD.decode(&*text).map_err(|e| CodecError::Base64 {
        offset: base64_error_offset(&e, text.len()),
        message: e.to_string(),
    })
}

fn base64_error_offset(error: &base64::DecodeError, text_len: usize) -> usize {
    match *error {
        base64::DecodeError::InvalidByte(offset, _) => offset,
        base64::DecodeError::InvalidLastSymbol(offset, _) => offset,
        base64::DecodeError::InvalidLength(len) => len,
        base64::DecodeError::InvalidPadding => text_len,
    }
}

/// Map a stream failure to a codec error.
///
/// The base64 reader reports offsets relative to the text it was given, which
/// is the non-whitespace text seen so far; `passed` is its length.
fn stream_error(error: io::Error, offset: usize, passed: usize) -> CodecError {
    let base64_error = error
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<base64::DecodeError>());
    match base64_error {
        Some(e) => CodecError::Base64 {
            offset: base64_error_offset(e, passed),
            message: e.to_string(),
        },
        None => CodecError::Io {
            offset,
            source: error,
        },
    }
}

/// Inflate a zlib stream whose decompressed size is only a hint.
///
/// The output buffer doubles whenever it fills. A stream that runs out of
/// input before its final block is an error, never a short result.
fn inflate(input: &[u8], size_hint: usize) -> Result<Vec<u8>, CodecError> {
    let mut inflater = Decompress::new(true);
    let initial = size_hint
        .min(input.len().saturating_mul(MAX_INFLATE_RATIO))
        .max(MIN_INFLATE_CAPACITY);
    let mut output = Vec::with_capacity(initial);

    loop {
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        let status = inflater
            .decompress_vec(&input[consumed..], &mut output, FlushDecompress::Finish)
            .map_err(|e| CodecError::Decompress {
                offset: inflater.total_in() as usize,
                message: e.to_string(),
            })?;

        if status == Status::StreamEnd {
            return Ok(output);
        }
        if output.len() == output.capacity() {
            output.reserve(output.capacity());
            continue;
        }

        let offset = inflater.total_in() as usize;
        let stalled = offset == consumed && inflater.total_out() == produced;
        if offset >= input.len() || stalled {
            return Err(CodecError::Truncated { offset });
        }
    }
}

/// Counts bytes pulled from the underlying source
struct CountingReader<R> {
    inner: R,
    count: usize,
}

impl<R> CountingReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n;
        Ok(n)
    }
}

/// Drops ASCII whitespace from base64 text
struct SkipWhitespace<R> {
    inner: R,
    /// Non-whitespace bytes handed out so far
    passed: usize,
}

impl<R> SkipWhitespace<R> {
    fn new(inner: R) -> Self {
        Self { inner, passed: 0 }
    }
}

impl<R: Read> Read for SkipWhitespace<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }
            let mut kept = 0;
            for i in 0..n {
                let byte = buf[i];
                if !byte.is_ascii_whitespace() {
                    buf[kept] = byte;
                    kept += 1;
                }
            }
            if kept > 0 {
                self.passed += kept;
                return Ok(kept);
            }
        }
    }
}
