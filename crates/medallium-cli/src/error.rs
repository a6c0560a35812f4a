//! Error types for the `medallium` binary.
//!
//! [`CliError`] wraps every failure mode of a single command run so that
//! command handlers can propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the `medallium` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: medallium_core::ConfigError,
    },

    /// Authored circle or achievement data failed to load.
    #[error("data error: {source}")]
    Data {
        /// The underlying data error.
        #[from]
        source: medallium_core::DataError,
    },

    /// A save file could not be read or written.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: medallium_core::StoreError,
    },

    /// The catalog file could not be read.
    #[error("failed to read catalog {}: {source}", path.display())]
    CatalogIo {
        /// Catalog path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog file is not a JSON list of items.
    #[error("failed to parse catalog {}: {source}", path.display())]
    CatalogJson {
        /// Catalog path.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// Rendering output failed.
    #[error("output error: {source}")]
    Output {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
