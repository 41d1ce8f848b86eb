//! Page image collection for classified folder groups.
//!
//! Walks each source folder recursively and gathers supported image files in a
//! deterministic order: within every directory, files come first in sorted
//! name order, then subdirectories are recursed in sorted name order. A
//! group's folders are walked in their declared order and the results
//! concatenated, which defines the final page order of the output document.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use rayon::prelude::*;
use tokio::fs::read_dir;

use crate::error::Result;
use crate::path_utils::is_hidden_entry;
use crate::report::{ProgressEvent, ProgressReporter};

/// File extensions accepted as page images (matched case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"];

/// Collects page images from source folders.
#[derive(Debug, Clone, Copy)]
pub struct ImageCollector;

impl ImageCollector {
    /// Returns true when the path carries a supported image extension.
    pub fn is_supported_image(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let lowered = ext.to_ascii_lowercase();
                SUPPORTED_EXTENSIONS.contains(&lowered.as_str())
            })
            .unwrap_or(false)
    }

    /// Recursively collects all supported images under `folder`.
    ///
    /// Traversal order per directory: sorted files, then sorted
    /// subdirectories. Hidden entries are skipped.
    pub async fn collect_folder(folder: &Path) -> Result<Vec<PathBuf>> {
        Self::walk(folder.to_path_buf()).await
    }

    /// Collects the images of every folder in a group, in declared folder
    /// order. An unreadable folder contributes nothing and emits a warning
    /// event instead of failing the group.
    pub async fn collect_group(
        folders: &[PathBuf],
        reporter: &dyn ProgressReporter,
    ) -> Vec<PathBuf> {
        let mut images = Vec::new();
        for folder in folders {
            match Self::collect_folder(folder).await {
                Ok(mut found) => images.append(&mut found),
                Err(e) => {
                    reporter.report(ProgressEvent::Warning {
                        message: format!("cannot read folder {}: {}", folder.display(), e),
                    });
                }
            }
        }
        images
    }

    fn walk(directory: PathBuf) -> Pin<Box<dyn Future<Output = Result<Vec<PathBuf>>> + Send>> {
        Box::pin(async move {
            let mut files = Vec::new();
            let mut subdirs = Vec::new();

            let mut entries = read_dir(&directory).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if is_hidden_entry(&path) {
                    continue;
                }
                if path.is_dir() {
                    subdirs.push(path);
                } else if Self::is_supported_image(&path) {
                    files.push(path);
                }
            }

            files.par_sort();
            subdirs.par_sort();

            let mut images = files;
            for subdir in subdirs {
                let mut nested = Self::walk(subdir).await?;
                images.append(&mut nested);
            }

            Ok(images)
        })
    }
}
