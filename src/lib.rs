//! Seihon - Manga Image Folder to PDF Conversion Library
//!
//! This crate converts a directory tree of manga page images into one or more
//! PDF files, grouping source folders by naming convention: per volume, per
//! chapter, or a hybrid of both.
//!
//! # Getting Started
//!
//! Configure a [`ConversionSettings`] via its builder, create a
//! [`ConversionSession`] for your source root, then run one of the
//! `process_*` methods.
//!
//! ```rust,no_run
//! use seihon::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> seihon::error::Result<()> {
//!     // 1. Configure the conversion
//!     let settings = ConversionSettings::builder()
//!         .image_processing(ImageProcessing::Jpeg)
//!         .pdf_quality(85u8)
//!         .resize_images(true)
//!         .max_width(1920u32)
//!         .max_height(1080u32)
//!         .build()?;
//!
//!     // 2. Create a session for the source root
//!     let session = ConversionSession::new("./my_manga/Series A", false, settings);
//!
//!     // Optional: validate the root before doing any work
//!     session.preflight_check()?;
//!
//!     // 3. Run the pipeline; volume folders merge, everything else stands alone
//!     let summary = session.process_hybrid().await?;
//!     println!(
//!         "{} created, {} skipped, {} failed",
//!         summary.created(),
//!         summary.skipped(),
//!         summary.failed()
//!     );
//!
//!     Ok(())
//! }
//! ```
//!
//! Progress is reported through an injected [`ProgressReporter`]; the default
//! sink forwards every event to the `log` facade. Attach your own reporter
//! with [`ConversionSession::with_reporter`] to drive a UI or collect events
//! in tests.

pub mod assembler;
pub mod classifier;
pub mod cleaner;
pub mod collector;
pub mod error;
pub mod generator;
pub mod path_utils;
pub mod report;
pub mod session;
pub mod types;

// Publicly expose the session entry point and the settings builder
pub use session::ConversionSession;
pub use types::{ConversionSettings, ConversionSettingsBuilder};

// Re-export core types for direct access
pub use report::{LogReporter, ProgressEvent, ProgressReporter};
pub use types::{
    ConversionOutcome, FolderGroups, GroupOutcome, GroupingMode, ImageProcessing, SessionSummary,
};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and traits, allowing you to
/// import everything you need with a single `use seihon::prelude::*;` statement.
pub mod prelude {
    pub use super::{
        ConversionOutcome, ConversionSession, ConversionSettings, ConversionSettingsBuilder,
        FolderGroups, GroupOutcome, GroupingMode, ImageProcessing, LogReporter, ProgressEvent,
        ProgressReporter, SessionSummary, error, generator, types,
    };
    pub use crate::classifier::PathClassifier;
    pub use crate::cleaner::DirectoryCleaner;
    pub use crate::collector::ImageCollector;
    pub use std::path::{Path, PathBuf};
    pub use std::sync::Arc;
}
