//! # peakstore - Data Point Storage for Mass Spectrometry
//!
//! `peakstore` holds the (coordinate, intensity) arrays of spectra and
//! chromatograms, in memory or spilled to disk, and decodes them from the
//! binary wire format of mzML files.
//!
//! ## Key Features
//!
//! - **Sorted point buffers**: growable parallel arrays kept sorted by m/z or
//!   retention time, reused across reads to avoid allocation churn.
//!
//! - **Binary peak codec**: base64, zlib, 32/64-bit, little/big-endian
//!   decoding and byte-identical encoding.
//!
//! - **Pluggable point stores**: integer handles backed by process memory or
//!   by a private, locked temp file. Safe to share between importer threads.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use peakstore::codec::{CodecConfig, Compression, PeakCodec, Precision};
//! use peakstore::points::MzPointBuffer;
//! use peakstore::store::{DataPointStore, StoreConfig};
//!
//! // Open a temp-file backed store
//! let store = StoreConfig::tmp_file().open()?;
//!
//! // Decode the two <binary> arrays of an mzML spectrum
//! let mz_config = CodecConfig::new(3).with_compression(Compression::Zlib);
//! let intensity_config = CodecConfig::new(3).with_precision(Precision::Float32);
//! # let mz_text = PeakCodec::encode(&[100.0f64, 200.0, 300.0], &mz_config)?;
//! # let intensity_text = PeakCodec::encode(&[1.0f32, 2.0, 3.0], &intensity_config)?;
//! let mut spectrum = MzPointBuffer::new();
//! PeakCodec::decode_into_buffer(
//!     &mut spectrum,
//!     &mz_text,
//!     &mz_config,
//!     &intensity_text,
//!     &intensity_config,
//! )?;
//!
//! // Keep only the handle
//! let id = store.store(&spectrum)?;
//!
//! // Later: refill a scratch buffer
//! store.read_into(id, &mut spectrum)?;
//! println!("TIC: {}", spectrum.total_intensity());
//!
//! store.dispose();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`points`]: the sorted (coordinate, intensity) container
//! - [`codec`]: binary array decoding and encoding
//! - [`store`]: handle-based storage backends

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod codec;
pub mod points;
pub mod store;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::codec::{
        CodecConfig, CodecError, Compression, Endianness, PeakCodec, PeakValue, Precision,
        TextEncoding,
    };
    pub use crate::points::{
        Coordinate, Mz, MzPointBuffer, PointsError, RetentionTime, RtPointBuffer,
        SortedPointBuffer,
    };
    pub use crate::store::{
        DataPointStore, MemoryDataPointStore, PointStore, StorageId, StoreBackend, StoreConfig,
        StoreError, StoreStats, TmpFileDataPointStore,
    };
}
