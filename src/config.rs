//! Configuration for profilestore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Default location of the database file, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/user_profiles.db";

/// Default location of the source Parquet file
pub const DEFAULT_SOURCE_PATH: &str = "data/user_profiles.parquet";

/// zstd level for compressed columns
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

/// Row cap for unfiltered exports
pub const DEFAULT_EXPORT_LIMIT: usize = 10_000;

/// Main configuration shared by the loader, server and export tool
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Database file produced by the loader and read by everything else
    pub db_path: PathBuf,

    /// Parquet file the loader reads from
    pub source_path: PathBuf,

    /// Replace an existing database file when loading
    pub overwrite: bool,

    /// zstd level the loader compresses text and blob columns with
    pub compression_level: i32,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,

    // -------------------------------------------------------------------------
    // Export Configuration
    // -------------------------------------------------------------------------
    /// Maximum rows written by an unfiltered export
    pub export_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            source_path: PathBuf::from(DEFAULT_SOURCE_PATH),
            overwrite: false,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            export_limit: DEFAULT_EXPORT_LIMIT,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file path
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Set the source Parquet file path
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.source_path = path.into();
        self
    }

    /// Allow the loader to replace an existing database
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    /// Set the zstd level used by the loader
    pub fn compression_level(mut self, level: i32) -> Self {
        self.config.compression_level = level;
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the unfiltered export row cap
    pub fn export_limit(mut self, limit: usize) -> Self {
        self.config.export_limit = limit;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
