//! Core data types and enums for the Seihon conversion library.
//!
//! This module defines the fundamental data structures used throughout Seihon:
//! - Session configuration (`ConversionSettings`, built via `ConversionSettingsBuilder`)
//! - Enumerations for conversion behavior (`ImageProcessing`, `GroupingMode`)
//! - Classification output (`FolderGroups`)
//! - Result reporting (`ConversionOutcome`, `GroupOutcome`, `SessionSummary`)

use std::collections::BTreeMap;
use std::path::PathBuf;

/// How source folders are grouped into output documents.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupingMode {
    /// Only folders matching a volume naming pattern, merged per volume number.
    Volumes,
    /// Every immediate subdirectory becomes its own document.
    Chapters,
    /// Volume-patterned folders merged per volume, everything else standalone.
    Hybrid,
}

/// How page images are re-encoded before being embedded in the output document.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageProcessing {
    /// Embed pixel data without a recompression pass.
    #[default]
    KeepOriginal,
    /// Re-encode each page as lossy JPEG at the configured quality.
    Jpeg,
    /// Embed each page as a lossless raw RGB stream.
    Png,
}

/// Classification result: group key to the source folders feeding that group.
///
/// Built once by the classifier and treated as immutable afterwards. Key
/// iteration order is sorted; folder order within a key follows the sorted
/// directory listing.
pub type FolderGroups = BTreeMap<String, Vec<PathBuf>>;

/// Immutable settings for a conversion session, established during
/// [`ConversionSettingsBuilder::build`].
///
/// ## Builder Pattern
///
/// Use [`ConversionSettings::builder()`](ConversionSettings::builder) to create
/// a configuration:
///
/// ```rust,no_run
/// # use seihon::prelude::*;
/// let settings = ConversionSettings::builder()
///     .image_processing(ImageProcessing::Jpeg)
///     .pdf_quality(75u8)
///     .resize_images(true)
///     .build()
///     .expect("Invalid settings");
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into, strip_option), build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionSettings {
    /// Page re-encoding strategy for embedded images.
    #[builder(default = "ImageProcessing::KeepOriginal")]
    pub image_processing: ImageProcessing,

    /// JPEG quality (1-100) used when `image_processing` is [`ImageProcessing::Jpeg`].
    #[builder(default = "85")]
    pub pdf_quality: u8,

    /// Whether document compression was requested. Recorded in the settings
    /// snapshot; page streams are already filter-controlled per `image_processing`.
    #[builder(default = "true")]
    pub pdf_compression: bool,

    /// Whether pages larger than `max_width` x `max_height` are shrunk to fit.
    /// Pages are never enlarged.
    #[builder(default = "false")]
    pub resize_images: bool,

    /// Maximum page width in pixels when `resize_images` is enabled.
    #[builder(default = "1920")]
    pub max_width: u32,

    /// Maximum page height in pixels when `resize_images` is enabled.
    #[builder(default = "1080")]
    pub max_height: u32,

    /// Base directory for output. When unset, output lands next to the source
    /// root (under its parent directory).
    #[builder(default)]
    pub output_folder: Option<PathBuf>,

    /// Open each generated document with the platform's default viewer.
    #[builder(default = "false")]
    pub auto_open_pdf: bool,

    /// Archive original page files to a sibling ZIP before they are deleted.
    /// Only takes effect when deletion was requested for the session.
    #[builder(default = "false")]
    pub backup_originals: bool,

    /// Delete source page files after their document was written successfully.
    #[builder(default = "false")]
    pub delete_after_conversion: bool,
}

impl ConversionSettings {
    /// Creates a new builder for configuring `ConversionSettings`.
    pub fn builder() -> ConversionSettingsBuilder {
        ConversionSettingsBuilder::default()
    }
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            image_processing: ImageProcessing::KeepOriginal,
            pdf_quality: 85,
            pdf_compression: true,
            resize_images: false,
            max_width: 1920,
            max_height: 1080,
            output_folder: None,
            auto_open_pdf: false,
            backup_originals: false,
            delete_after_conversion: false,
        }
    }
}

impl ConversionSettingsBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(quality) = self.pdf_quality {
            if !(1..=100).contains(&quality) {
                return Err("pdf_quality must be between 1 and 100.".to_string());
            }
        }
        if let Some(width) = self.max_width {
            if width == 0 {
                return Err("max_width must be at least 1.".to_string());
            }
        }
        if let Some(height) = self.max_height {
            if height == 0 {
                return Err("max_height must be at least 1.".to_string());
            }
        }
        Ok(())
    }
}

/// Result of assembling one group into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ConversionOutcome {
    /// The document was written successfully.
    Created { path: PathBuf, page_count: usize },
    /// Nothing to do for this group (e.g., no images found).
    Skipped { reason: String },
    /// The group failed; later groups are unaffected.
    Failed { error: String },
}

/// A group key paired with its conversion outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupOutcome {
    pub group: String,
    pub outcome: ConversionOutcome,
}

/// Per-session summary over all processed groups.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SessionSummary {
    pub outcomes: Vec<GroupOutcome>,
}

impl SessionSummary {
    /// Number of documents written successfully.
    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, ConversionOutcome::Created { .. }))
            .count()
    }

    /// Number of groups skipped without output.
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, ConversionOutcome::Skipped { .. }))
            .count()
    }

    /// Number of groups that failed.
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, ConversionOutcome::Failed { .. }))
            .count()
    }
}
