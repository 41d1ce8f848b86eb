//! Generator module provides the trait and implementations for document writers.
//!
//! This module contains the common page-feeding interface shared by the PDF
//! writer and the backup archiver, plus the format-specific implementations.

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub mod archive;
pub mod pdf;

pub use archive::Archive;
pub use pdf::Pdf;

/// Common interface for all document generators.
///
/// The `Generator` trait defines a consistent page-feeding API for writers
/// that assemble a document from source images. Construction is format
/// specific and lives on the implementing types ([`Pdf::create`],
/// [`Archive::create`]).
#[async_trait]
pub trait Generator {
    /// Adds a page to the generated document.
    ///
    /// # Parameters
    /// * `image_path` - Path to the image file to add as a page
    ///
    /// # Returns
    /// * `Result<&mut Self>` - Self reference for method chaining, or an error if failed
    async fn add_page(&mut self, image_path: &Path) -> Result<&mut Self>
    where
        Self: Sized;

    /// Saves the generated document to disk.
    ///
    /// Finalizes the document and writes it to the configured output location.
    ///
    /// # Returns
    /// * `Result<()>` - Success indicator or an error if saving fails
    async fn save(self) -> Result<()>;
}
