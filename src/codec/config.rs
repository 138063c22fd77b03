use super::CodecError;

/// Numeric precision of an encoded array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// 32-bit floating point (CV: MS:1000521)
    Float32,
    /// 64-bit floating point (CV: MS:1000523)
    #[default]
    Float64,
}

impl Precision {
    /// Determine precision from CV accession
    pub fn from_cv_accession(accession: &str) -> Option<Self> {
        match accession {
            "MS:1000521" => Some(Precision::Float32),
            "MS:1000523" => Some(Precision::Float64),
            _ => None,
        }
    }

    /// Get the byte size per value
    pub fn byte_size(&self) -> usize {
        match self {
            Precision::Float32 => 4,
            Precision::Float64 => 8,
        }
    }
}

/// Byte order of an encoded array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    /// Least significant byte first (mzML)
    #[default]
    Little,
    /// Most significant byte first (mzXML)
    Big,
}

impl Endianness {
    /// Byte order of the running platform
    #[cfg(target_endian = "little")]
    pub const NATIVE: Endianness = Endianness::Little;
    /// Byte order of the running platform
    #[cfg(target_endian = "big")]
    pub const NATIVE: Endianness = Endianness::Big;
}

/// Compression applied to the binary payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    /// No compression (CV: MS:1000576)
    #[default]
    None,
    /// zlib-wrapped DEFLATE (CV: MS:1000574)
    Zlib,
}

impl Compression {
    /// Determine compression type from CV accession
    pub fn from_cv_accession(accession: &str) -> Option<Self> {
        match accession {
            "MS:1000574" => Some(Compression::Zlib),
            "MS:1000576" => Some(Compression::None),
            _ => None,
        }
    }
}

/// MS-Numpress linear, positive integer and short logged float accessions
const NUMPRESS_ACCESSIONS: [&str; 3] = ["MS:1002312", "MS:1002313", "MS:1002314"];

/// Text layer wrapped around the binary payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    /// Bytes are the payload itself
    Raw,
    /// Bytes are base64 text, as inside an mzML `<binary>` element
    #[default]
    Base64,
}

/// How a single binary array is encoded.
///
/// The defaults match mzML: base64 text of uncompressed little-endian
/// doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecConfig {
    /// Width of each value
    pub precision: Precision,
    /// Byte order of each value
    pub endianness: Endianness,
    /// Payload compression
    pub compression: Compression,
    /// Text layer around the (possibly compressed) payload
    pub text: TextEncoding,
    /// Maximum number of bytes to consume from the source, if bounded
    pub encoded_length: Option<usize>,
    /// Number of values the array must decode to
    pub expected_count: usize,
}

impl CodecConfig {
    /// mzML defaults for an array of `expected_count` values
    pub fn new(expected_count: usize) -> Self {
        Self {
            expected_count,
            ..Self::default()
        }
    }

    /// Configuration for a raw (non-text) payload in native byte order
    pub fn native_raw(precision: Precision, expected_count: usize) -> Self {
        Self {
            precision,
            endianness: Endianness::NATIVE,
            compression: Compression::None,
            text: TextEncoding::Raw,
            encoded_length: None,
            expected_count,
        }
    }

    /// Build a configuration from the CV accessions of a `<binaryDataArray>`.
    ///
    /// Unknown accessions (array type, units) are ignored.
    ///
    /// # Errors
    /// Returns [`CodecError::UnsupportedCompression`] for MS-Numpress.
    pub fn from_cv_accessions<'a, I>(accessions: I, expected_count: usize) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut config = Self::new(expected_count);
        for accession in accessions {
            if let Some(precision) = Precision::from_cv_accession(accession) {
                config.precision = precision;
            } else if let Some(compression) = Compression::from_cv_accession(accession) {
                config.compression = compression;
            } else if NUMPRESS_ACCESSIONS.iter().any(|&numpress| numpress == accession) {
                return Err(CodecError::UnsupportedCompression(format!(
                    "MS-Numpress ({})",
                    accession
                )));
            }
        }
        Ok(config)
    }

    /// Set the value precision
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Set the byte order
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    /// Set the payload compression
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the text layer
    pub fn with_text(mut self, text: TextEncoding) -> Self {
        self.text = text;
        self
    }

    /// Bound the number of source bytes consumed
    pub fn with_encoded_length(mut self, encoded_length: usize) -> Self {
        self.encoded_length = Some(encoded_length);
        self
    }

    /// Set the expected number of values
    pub fn with_expected_count(mut self, expected_count: usize) -> Self {
        self.expected_count = expected_count;
        self
    }

    /// Size in bytes of the uncompressed payload
    pub fn payload_len(&self) -> usize {
        self.expected_count.saturating_mul(self.precision.byte_size())
    }
}
