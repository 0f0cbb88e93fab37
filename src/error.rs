//! Error types for keira-catalog
//!
//! This module provides the error handling for the library:
//! - A top-level [`Error`] for setup and I/O failures that can abort a run
//! - Domain-specific errors ([`ManifestError`], [`AssetError`], [`ImageError`]) raised per item
//!   or per asset, which the pipeline downgrades to recorded warnings
//! - A mapping from every domain error to the [`WarningCategory`] it is reported under

use crate::types::WarningCategory;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for keira-catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for keira-catalog
///
/// Only setup failures (missing source tree, unwritable build directory, invalid configuration)
/// propagate out of [`CatalogBuilder::run`](crate::CatalogBuilder::run). Everything raised while
/// processing a single item is converted into a warning instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "page_size")
        key: Option<String>,
    },

    /// The source tree to build from does not exist
    #[error("source tree not found: {}", .0.display())]
    SourceTreeMissing(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors raised while reading and validating one manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file is not a valid YAML mapping of the expected shape
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Path of the manifest file
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// A required field is absent
    #[error("required field '{field}' is missing")]
    MissingField {
        /// Dotted field name (e.g., "sources.location.origin")
        field: &'static str,
    },

    /// The file an `@`-prefixed field points at could not be read
    #[error("failed to read '{}' for field '{field}': {source}", path.display())]
    FileRead {
        /// Field whose value was an indirection
        field: &'static str,
        /// Resolved path of the referenced file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while probing or materializing one asset
#[derive(Debug, Error)]
pub enum AssetError {
    /// The remote host answered that the resource does not exist
    #[error("{url} not found")]
    NotFound {
        /// URL that was probed or fetched
        url: String,
    },

    /// The remote host answered with a non-success status other than "not found"
    #[error("{url} returned HTTP {status}")]
    HttpStatus {
        /// URL that was probed or fetched
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The request did not complete (timeout, DNS failure, connection refused, ...)
    #[error("{url} unreachable: {source}")]
    Unreachable {
        /// URL that was probed or fetched
        url: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// A relative-path asset does not exist in the item's source folder
    #[error("{} does not exist", path.display())]
    Missing {
        /// Absolute path that was checked
        path: PathBuf,
    },

    /// Copying or writing the asset into the output tree failed
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by image normalization or icon transcoding
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image could not be opened or decoded
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// Image path
        path: PathBuf,
        /// Underlying codec error
        #[source]
        source: image::ImageError,
    },

    /// The image could not be re-encoded
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        /// Image path
        path: PathBuf,
        /// Underlying codec error
        #[source]
        source: image::ImageError,
    },

    /// The image file extension does not map to a known format
    #[error("unsupported image format: {}", path.display())]
    UnsupportedFormat {
        /// Image path
        path: PathBuf,
    },

    /// Reading or writing the image file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Image path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The blocking worker running the image operation panicked or was cancelled
    #[error("image task failed: {0}")]
    Task(String),
}

impl ManifestError {
    /// Warning category this error is reported under
    pub fn category(&self) -> WarningCategory {
        match self {
            ManifestError::Parse { .. } => WarningCategory::ManifestParseError,
            ManifestError::MissingField { .. } => WarningCategory::MissingField,
            ManifestError::FileRead { .. } => WarningCategory::FileReadError,
        }
    }
}

impl AssetError {
    /// Whether the remote explicitly reported the resource as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetError::NotFound { .. })
    }

    /// Warning category this error is reported under when it is not attributed to a specific field
    pub fn category(&self) -> WarningCategory {
        match self {
            AssetError::Missing { .. } => WarningCategory::AssetMissing,
            AssetError::NotFound { .. }
            | AssetError::HttpStatus { .. }
            | AssetError::Unreachable { .. }
            | AssetError::Write { .. } => WarningCategory::AssetFetchError,
        }
    }
}

impl Error {
    /// Create a configuration error for the given key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
