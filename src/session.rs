//! Session orchestration: one source root, one settings snapshot, one mode.
//!
//! A [`ConversionSession`] ties the pipeline together: classify the root's
//! subfolders, compute the output directory, assemble every group, then sweep
//! empty directories. Completed documents are never rolled back when a later
//! group fails.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tokio::fs;

use crate::assembler::PdfAssembler;
use crate::classifier::PathClassifier;
use crate::cleaner::DirectoryCleaner;
use crate::error::{Error, Result};
use crate::path_utils::{get_file_name_lossy, sanitize_filename};
use crate::report::{LogReporter, ProgressEvent, ProgressReporter};
use crate::types::{ConversionSettings, GroupingMode, SessionSummary};

/// Name of the directory created under the output base for generated files.
const OUTPUT_DIR_NAME: &str = "PDF";

/// One conversion run over a source root.
///
/// Settings are snapshotted at construction and immutable for the session's
/// duration. The session assumes exclusive access to the root and output
/// directories; callers must not run two sessions against the same paths
/// concurrently.
///
/// # Example
///
/// ```rust,no_run
/// use seihon::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> seihon::error::Result<()> {
///     let settings = ConversionSettings::builder()
///         .image_processing(ImageProcessing::Jpeg)
///         .pdf_quality(85u8)
///         .build()?;
///
///     let session = ConversionSession::new("./my_manga/Series A", false, settings);
///     let summary = session.process_hybrid().await?;
///     println!("{} volume(s) created", summary.created());
///     Ok(())
/// }
/// ```
pub struct ConversionSession {
    root: PathBuf,
    delete_images: bool,
    settings: ConversionSettings,
    reporter: Arc<dyn ProgressReporter>,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl ConversionSession {
    /// Creates a session for `root`. `delete_images` requests removal of the
    /// source files after each successful document write; the
    /// `delete_after_conversion` setting has the same effect and either alone
    /// is sufficient.
    pub fn new(root: impl Into<PathBuf>, delete_images: bool, settings: ConversionSettings) -> Self {
        Self {
            root: root.into(),
            delete_images,
            settings,
            reporter: Arc::new(LogReporter),
            cancel_flag: None,
        }
    }

    /// Replaces the default log-forwarding reporter with a caller-owned sink.
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Attaches a cooperative cancellation flag, checked between groups only.
    /// An in-flight group always runs to completion.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Validates the session's root path without doing any work.
    ///
    /// Called automatically by every `process_*` method; invoking it manually
    /// is optional but gives earlier error detection.
    pub fn preflight_check(&self) -> Result<&Self> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::Other("A source root path is required.".to_string()));
        }
        if !self.root.exists() {
            return Err(Error::NotFound(format!(
                "Source root does not exist: {:?}",
                self.root
            )));
        }
        if !self.root.is_dir() {
            return Err(Error::InvalidPath(
                self.root.clone(),
                "Source root is not a directory.".to_string(),
            ));
        }
        Ok(self)
    }

    /// Converts volume-patterned folders, merged per volume number. Folders
    /// matching no volume pattern are excluded with a warning.
    pub async fn process_volumes(self) -> Result<SessionSummary> {
        self.run(GroupingMode::Volumes).await
    }

    /// Converts every immediate subdirectory into its own document.
    pub async fn process_chapters(self) -> Result<SessionSummary> {
        self.run(GroupingMode::Chapters).await
    }

    /// Merges volume-patterned folders per volume and converts every other
    /// folder standalone.
    pub async fn process_hybrid(self) -> Result<SessionSummary> {
        self.run(GroupingMode::Hybrid).await
    }

    async fn run(self, mode: GroupingMode) -> Result<SessionSummary> {
        self.preflight_check()?;

        self.reporter.report(ProgressEvent::SessionStarted {
            root: self.root.clone(),
            mode,
        });

        let classifier = PathClassifier::new(mode);
        let groups = classifier.classify(&self.root, self.reporter.as_ref()).await;

        if groups.is_empty() {
            self.reporter.report(ProgressEvent::Warning {
                message: format!("no convertible folders found in {}", self.root.display()),
            });
            self.reporter.report(ProgressEvent::SessionCompleted {
                created: 0,
                skipped: 0,
                failed: 0,
            });
            return Ok(SessionSummary::default());
        }

        let output_dir = self.output_dir();
        fs::create_dir_all(&output_dir).await?;

        let delete_originals = self.delete_images || self.settings.delete_after_conversion;

        let assembler = PdfAssembler::new(&self.settings, self.reporter.as_ref());
        let outcomes = assembler
            .process_groups(
                &groups,
                &output_dir,
                self.delete_images,
                self.cancel_flag.as_deref(),
            )
            .await;

        let removed = DirectoryCleaner::cleanup(&self.root).await;
        if delete_originals && !removed {
            self.reporter.report(ProgressEvent::Warning {
                message: format!(
                    "could not remove source directory {} (may not be empty)",
                    self.root.display()
                ),
            });
        }

        let summary = SessionSummary { outcomes };
        self.reporter.report(ProgressEvent::SessionCompleted {
            created: summary.created(),
            skipped: summary.skipped(),
            failed: summary.failed(),
        });

        Ok(summary)
    }

    /// Output directory for this session: `<base>/PDF/<root_basename>/`,
    /// where `base` is the configured output folder or the root's parent.
    fn output_dir(&self) -> PathBuf {
        let base = self
            .settings
            .output_folder
            .clone()
            .unwrap_or_else(|| self.root.parent().unwrap_or(Path::new(".")).to_path_buf());
        let name = sanitize_filename(&get_file_name_lossy(&self.root));
        base.join(OUTPUT_DIR_NAME).join(name)
    }
}
