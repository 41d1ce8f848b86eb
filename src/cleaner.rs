//! Best-effort removal of empty directories after conversion.
//!
//! Once a session has deleted source images, the emptied folder skeleton is
//! worthless; this pass removes it. Cleanup is purely cosmetic: every removal
//! failure is swallowed and logged at debug level, and a directory that still
//! contains anything is left untouched.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::fs;

/// Removes empty directories under (and including) a root.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryCleaner;

impl DirectoryCleaner {
    /// Depth-first post-order sweep: children are cleaned before their parent
    /// is considered, so a tree that is empty apart from nested empty
    /// directories collapses completely.
    ///
    /// Returns true iff `root` itself was removed.
    pub async fn cleanup(root: &Path) -> bool {
        Self::sweep(root.to_path_buf()).await
    }

    fn sweep(directory: PathBuf) -> Pin<Box<dyn Future<Output = bool> + Send>> {
        Box::pin(async move {
            let mut entries = match fs::read_dir(&directory).await {
                Ok(entries) => entries,
                Err(e) => {
                    log::debug!("cleanup: cannot list {}: {}", directory.display(), e);
                    return false;
                }
            };

            let mut subdirs = Vec::new();
            let mut has_files = false;
            loop {
                match entries.next_entry().await {
                    Ok(Some(entry)) => {
                        let path = entry.path();
                        if path.is_dir() {
                            subdirs.push(path);
                        } else {
                            has_files = true;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        log::debug!("cleanup: error listing {}: {}", directory.display(), e);
                        return false;
                    }
                }
            }

            let mut all_children_removed = true;
            for subdir in subdirs {
                if !Self::sweep(subdir).await {
                    all_children_removed = false;
                }
            }

            if has_files || !all_children_removed {
                return false;
            }

            match fs::remove_dir(&directory).await {
                Ok(()) => {
                    log::debug!("cleanup: removed empty directory {}", directory.display());
                    true
                }
                Err(e) => {
                    log::debug!("cleanup: could not remove {}: {}", directory.display(), e);
                    false
                }
            }
        })
    }
}
