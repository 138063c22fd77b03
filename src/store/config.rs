//! Store configuration, optionally loaded from TOML:
//!
//! ```toml
//! # peakstore.toml
//! [store]
//! backend = "tmp_file"
//! temp_dir = "/scratch"
//! file_prefix = "peakstore-"
//! scratch_capacity = 65536
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use super::{MemoryDataPointStore, PointStore, StoreError, TmpFileDataPointStore};

/// Which medium holds stored points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Private clones in process memory
    Memory,
    /// Encoded records appended to a private temp file
    #[default]
    TmpFile,
}

/// Configuration for opening a [`PointStore`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend to open
    pub backend: StoreBackend,

    /// Directory for the backing file (OS temp directory when unset)
    pub temp_dir: Option<PathBuf>,

    /// File name prefix of the backing file
    pub file_prefix: String,

    /// Initial size in bytes of the disk backend's scratch buffer
    pub scratch_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            temp_dir: None,
            file_prefix: "peakstore-".to_string(),
            // room for a 5k-point spectrum without regrowth
            scratch_capacity: 64 * 1024,
        }
    }
}

/// Root of a TOML configuration file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    store: StoreConfig,
}

impl StoreConfig {
    /// Configuration for an in-memory store
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }

    /// Configuration for a temp-file store
    pub fn tmp_file() -> Self {
        Self {
            backend: StoreBackend::TmpFile,
            ..Self::default()
        }
    }

    /// Place the backing file inside `dir`
    pub fn with_temp_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Load configuration from the `[store]` table of a TOML file
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        content.parse()
    }

    /// Open a new, empty store as configured
    pub fn open(&self) -> Result<PointStore, StoreError> {
        Ok(match self.backend {
            StoreBackend::Memory => PointStore::Memory(MemoryDataPointStore::new()),
            StoreBackend::TmpFile => PointStore::TmpFile(TmpFileDataPointStore::with_config(self)?),
        })
    }
}

impl FromStr for StoreConfig {
    type Err = StoreError;

    /// Parse the `[store]` table of a TOML document
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| {
            StoreError::Config(format!("Failed to parse TOML configuration: {}", e))
        })?;
        Ok(file.store)
    }
}
