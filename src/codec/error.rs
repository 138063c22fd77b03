use crate::points::PointsError;

/// Errors that can occur while decoding or encoding binary peak arrays.
///
/// Every decoding failure carries the byte offset at which it was detected.
/// For base64 input the offset counts non-whitespace characters; for
/// compressed input it counts compressed bytes; otherwise it counts payload
/// bytes.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Malformed base64 text
    #[error("Base64 decode error at offset {offset}: {message}")]
    Base64 {
        /// Offset of the offending character
        offset: usize,
        /// Description from the base64 decoder
        message: String,
    },

    /// Corrupt deflate stream
    #[error("Decompression error at offset {offset}: {message}")]
    Decompress {
        /// Compressed bytes consumed when the error was detected
        offset: usize,
        /// Description from the inflater
        message: String,
    },

    /// Deflate stream ended before its final block
    #[error("Truncated deflate stream: input ended at offset {offset}")]
    Truncated {
        /// Compressed bytes consumed before the stream ran out
        offset: usize,
    },

    /// Payload size does not match `expected_count * value width`
    #[error("Invalid data length at offset {offset}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// First byte that is missing or surplus
        offset: usize,
        /// Expected payload size in bytes
        expected: usize,
        /// Actual payload size in bytes
        actual: usize,
    },

    /// Coordinate and intensity arrays decoded to different lengths
    #[error("Array length mismatch: {primary} coordinates vs {intensity} intensities")]
    LengthMismatch {
        /// Number of coordinate values
        primary: usize,
        /// Number of intensity values
        intensity: usize,
    },

    /// Compression scheme this codec does not implement
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),

    /// Failure reading from a stream source
    #[error("I/O error at offset {offset}: {source}")]
    Io {
        /// Source bytes consumed when the error occurred
        offset: usize,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Decoded arrays could not populate a point buffer
    #[error(transparent)]
    Points(#[from] PointsError),
}
