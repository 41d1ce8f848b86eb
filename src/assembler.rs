//! Batch assembly of image groups into PDF documents.
//!
//! [`PdfAssembler::assemble`] turns one ordered image list into one PDF with
//! per-image failure isolation, then runs the post-write side effects (backup,
//! source deletion, auto-open) as an ordered list of independently guarded
//! actions. [`PdfAssembler::process_groups`] drives all groups of a session
//! sequentially with per-group failure isolation.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::fs;

use crate::collector::ImageCollector;
use crate::error::{Error, Result};
use crate::generator::{Archive, Generator, Pdf};
use crate::path_utils::sanitize_filename;
use crate::report::{ProgressEvent, ProgressReporter};
use crate::types::{ConversionOutcome, ConversionSettings, FolderGroups, GroupOutcome};

/// Post-write side effects in their fixed execution order. A failing action
/// emits a warning and never affects the others or the conversion result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PostAction {
    BackupOriginals,
    DeleteSources,
    OpenDocument,
}

const POST_ACTIONS: [PostAction; 3] = [
    PostAction::BackupOriginals,
    PostAction::DeleteSources,
    PostAction::OpenDocument,
];

impl PostAction {
    fn label(&self) -> &'static str {
        match self {
            PostAction::BackupOriginals => "backup",
            PostAction::DeleteSources => "source deletion",
            PostAction::OpenDocument => "auto-open",
        }
    }
}

/// Assembles classified folder groups into PDF documents.
pub struct PdfAssembler<'a> {
    settings: &'a ConversionSettings,
    reporter: &'a dyn ProgressReporter,
}

impl<'a> PdfAssembler<'a> {
    pub fn new(settings: &'a ConversionSettings, reporter: &'a dyn ProgressReporter) -> Self {
        Self { settings, reporter }
    }

    /// Assembles `images` into a single PDF at `output_path`.
    ///
    /// An empty input is a skip, not an error. Individual images that fail to
    /// decode or encode are dropped with a warning; the document is written
    /// from the survivors. If every image fails the whole group fails with
    /// [`Error::NoValidImages`] and no output file is left behind.
    pub async fn assemble(
        &self,
        images: &[PathBuf],
        output_path: &Path,
        delete_originals: bool,
    ) -> Result<ConversionOutcome> {
        log::debug!(
            "assembling {} with settings: {:?}",
            output_path.display(),
            self.settings
        );

        if images.is_empty() {
            return Ok(ConversionOutcome::Skipped {
                reason: "no images found".to_string(),
            });
        }

        let mut pdf = Pdf::create(output_path, self.settings)?;
        for image in images {
            if let Err(e) = pdf.add_page(image).await {
                self.reporter.report(ProgressEvent::Warning {
                    message: format!("skipping page {}: {}", image.display(), e),
                });
            }
        }

        let page_count = pdf.page_count();
        if page_count == 0 {
            return Err(Error::NoValidImages(output_path.to_path_buf()));
        }
        pdf.save().await?;

        for action in POST_ACTIONS {
            if !self.applies(action, delete_originals) {
                continue;
            }
            if let Err(e) = self.run_post_action(action, images, output_path).await {
                self.reporter.report(ProgressEvent::Warning {
                    message: format!(
                        "{} failed for {}: {}",
                        action.label(),
                        output_path.display(),
                        e
                    ),
                });
            }
        }

        Ok(ConversionOutcome::Created {
            path: output_path.to_path_buf(),
            page_count,
        })
    }

    /// Processes every group in sorted key order, isolating failures per
    /// group. The cancellation flag is checked between groups only; a
    /// cancelled run returns the outcomes accumulated so far.
    pub async fn process_groups(
        &self,
        groups: &FolderGroups,
        output_dir: &Path,
        delete_originals: bool,
        cancel_flag: Option<&AtomicBool>,
    ) -> Vec<GroupOutcome> {
        let mut outcomes = Vec::with_capacity(groups.len());

        for (key, folders) in groups {
            if let Some(flag) = cancel_flag {
                if flag.load(Ordering::Relaxed) {
                    self.reporter.report(ProgressEvent::Warning {
                        message: "conversion cancelled, remaining groups were not processed"
                            .to_string(),
                    });
                    break;
                }
            }

            self.reporter.report(ProgressEvent::GroupStarted {
                group: key.clone(),
                folder_count: folders.len(),
            });

            let images = ImageCollector::collect_group(folders, self.reporter).await;
            self.reporter.report(ProgressEvent::ImagesFound {
                group: key.clone(),
                image_count: images.len(),
            });

            if images.is_empty() {
                let reason = "no images found".to_string();
                self.reporter.report(ProgressEvent::GroupSkipped {
                    group: key.clone(),
                    reason: reason.clone(),
                });
                outcomes.push(GroupOutcome {
                    group: key.clone(),
                    outcome: ConversionOutcome::Skipped { reason },
                });
                continue;
            }

            let output_path = output_dir.join(format!("{}.pdf", sanitize_filename(key)));
            match self.assemble(&images, &output_path, delete_originals).await {
                Ok(outcome) => {
                    match &outcome {
                        ConversionOutcome::Created { path, page_count } => {
                            self.reporter.report(ProgressEvent::GroupCompleted {
                                group: key.clone(),
                                path: path.clone(),
                                page_count: *page_count,
                            });
                        }
                        ConversionOutcome::Skipped { reason } => {
                            self.reporter.report(ProgressEvent::GroupSkipped {
                                group: key.clone(),
                                reason: reason.clone(),
                            });
                        }
                        ConversionOutcome::Failed { error } => {
                            self.reporter.report(ProgressEvent::GroupFailed {
                                group: key.clone(),
                                error: error.clone(),
                            });
                        }
                    }
                    outcomes.push(GroupOutcome {
                        group: key.clone(),
                        outcome,
                    });
                }
                Err(e) => {
                    let error = e.to_string();
                    self.reporter.report(ProgressEvent::GroupFailed {
                        group: key.clone(),
                        error: error.clone(),
                    });
                    outcomes.push(GroupOutcome {
                        group: key.clone(),
                        outcome: ConversionOutcome::Failed { error },
                    });
                }
            }
        }

        outcomes
    }

    fn applies(&self, action: PostAction, delete_originals: bool) -> bool {
        match action {
            PostAction::BackupOriginals => self.settings.backup_originals && delete_originals,
            PostAction::DeleteSources => {
                delete_originals || self.settings.delete_after_conversion
            }
            PostAction::OpenDocument => self.settings.auto_open_pdf,
        }
    }

    async fn run_post_action(
        &self,
        action: PostAction,
        images: &[PathBuf],
        output_path: &Path,
    ) -> Result<()> {
        match action {
            PostAction::BackupOriginals => self.backup_originals(images, output_path).await,
            PostAction::DeleteSources => self.delete_sources(images).await,
            PostAction::OpenDocument => open_with_default_viewer(output_path),
        }
    }

    async fn backup_originals(&self, images: &[PathBuf], output_path: &Path) -> Result<()> {
        let archive_path = backup_path(output_path);
        let mut archive = Archive::create(&archive_path)?;

        for image in images {
            if !fs::try_exists(image).await.unwrap_or(false) {
                self.reporter.report(ProgressEvent::Warning {
                    message: format!("original {} missing at backup time", image.display()),
                });
                continue;
            }
            if let Err(e) = archive.add_page(image).await {
                self.reporter.report(ProgressEvent::Warning {
                    message: format!("could not back up {}: {}", image.display(), e),
                });
            }
        }

        archive.save().await?;
        log::debug!("backed up originals to {}", archive_path.display());
        Ok(())
    }

    async fn delete_sources(&self, images: &[PathBuf]) -> Result<()> {
        for image in images {
            match fs::remove_file(image).await {
                Ok(()) => {}
                // Already gone, nothing to delete
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    self.reporter.report(ProgressEvent::Warning {
                        message: format!("could not delete {}: {}", image.display(), e),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Sibling backup archive path: `<stem>_backup.zip` next to the document.
fn backup_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string());
    output_path.with_file_name(format!("{}_backup.zip", stem))
}

/// Opens a file with the platform's default application.
fn open_with_default_viewer(path: &Path) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        Command::new("cmd").args(["/C", "start", ""]).arg(path).spawn()?;
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        Command::new("xdg-open").arg(path).spawn()?;
    }

    Ok(())
}
