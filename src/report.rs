//! Progress reporting for conversion sessions.
//!
//! Sessions emit [`ProgressEvent`]s through an injected [`ProgressReporter`]
//! instead of writing to a global logger, so callers (GUIs, CLIs, tests) can
//! attach their own sink. [`LogReporter`] is the default sink and forwards
//! every event to the `log` facade.

use std::path::PathBuf;

use crate::types::GroupingMode;

/// A single observable step of a conversion session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ProgressEvent {
    /// A session began processing a source root.
    SessionStarted { root: PathBuf, mode: GroupingMode },
    /// A group is about to be assembled.
    GroupStarted {
        group: String,
        folder_count: usize,
    },
    /// Image collection for a group finished.
    ImagesFound { group: String, image_count: usize },
    /// A group's document was written.
    GroupCompleted {
        group: String,
        path: PathBuf,
        page_count: usize,
    },
    /// A group produced no output.
    GroupSkipped { group: String, reason: String },
    /// A group failed; the session continues with later groups.
    GroupFailed { group: String, error: String },
    /// A non-fatal condition worth surfacing (excluded folder, unreadable
    /// directory, skipped page, failed side effect).
    Warning { message: String },
    /// The session finished; counts cover every processed group.
    SessionCompleted {
        created: usize,
        skipped: usize,
        failed: usize,
    },
}

/// Sink for [`ProgressEvent`]s emitted during a session.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Default reporter that forwards events to the `log` facade.
#[derive(Debug, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::SessionStarted { root, mode } => {
                log::info!("starting {:?} conversion for {}", mode, root.display());
            }
            ProgressEvent::GroupStarted {
                group,
                folder_count,
            } => {
                log::info!("processing group '{}' ({} folder(s))", group, folder_count);
            }
            ProgressEvent::ImagesFound { group, image_count } => {
                log::info!("found {} image(s) for group '{}'", image_count, group);
            }
            ProgressEvent::GroupCompleted {
                group,
                path,
                page_count,
            } => {
                log::info!(
                    "created {} with {} page(s) for group '{}'",
                    path.display(),
                    page_count,
                    group
                );
            }
            ProgressEvent::GroupSkipped { group, reason } => {
                log::info!("skipped group '{}': {}", group, reason);
            }
            ProgressEvent::GroupFailed { group, error } => {
                log::error!("group '{}' failed: {}", group, error);
            }
            ProgressEvent::Warning { message } => {
                log::warn!("{}", message);
            }
            ProgressEvent::SessionCompleted {
                created,
                skipped,
                failed,
            } => {
                log::info!(
                    "session finished: {} created, {} skipped, {} failed",
                    created,
                    skipped,
                    failed
                );
            }
        }
    }
}
