//! Custom error types and result handling for Seihon operations.
//!
//! This module defines the error handling system used throughout Seihon.
//! All operations return a [`Result<T>`] which is a type alias for `std::result::Result<T, Error>`.
//!
use std::path::PathBuf;

/// Type alias for Results with Seihon errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all Seihon operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O errors from the standard library
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Image decoding and encoding errors
    #[error(transparent)]
    Image(#[from] image::ImageError),
    /// ZIP archive operation errors
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    /// Async task join errors
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error(transparent)]
    SettingsBuilder(#[from] crate::types::ConversionSettingsBuilderError),
    /// Error for invalid file or directory paths
    #[error("The given path '{0:?}' is invalid: {1}")]
    InvalidPath(PathBuf, String),
    /// Error for resources that couldn't be found (e.g., source directory)
    #[error("Not found: {0}")]
    NotFound(String),
    /// Error for a group where every collected image failed to process
    #[error("No valid images could be processed for '{0:?}'")]
    NoValidImages(PathBuf),
    /// Error while writing the output document
    #[error("Failed to write document '{0:?}': {1}")]
    DocumentWrite(PathBuf, String),
    /// Other errors that don't fit into specific categories
    #[error("Other error: {0}")]
    Other(String),
}

// Basic From<String> conversion for convenience
impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Other(error)
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error::Other(error.to_string())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}
