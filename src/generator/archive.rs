//! Backup ZIP writer for original page files.
//!
//! Archives the source images of a group before they are deleted. Entries are
//! named by file basename, flattening the folder structure of the group.

use async_trait::async_trait;
use memmap2::MmapOptions;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tokio::fs;
use tokio::task::spawn_blocking;

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::path_utils::{get_file_name_lossy, path_to_string_lossy};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A generator that packs original page files into a backup ZIP archive.
pub struct Archive {
    zip: Option<ZipWriter<File>>,
    options: SimpleFileOptions,
}

impl Archive {
    /// Creates a new archive at `archive_path`.
    pub fn create(archive_path: &Path) -> Result<Self> {
        let options: SimpleFileOptions = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o755);

        let file = File::create(archive_path)?;
        let zip = ZipWriter::new(file);

        Ok(Archive {
            zip: Some(zip),
            options,
        })
    }
}

#[async_trait]
impl Generator for Archive {
    async fn add_page(&mut self, image_path: &Path) -> Result<&mut Self> {
        let entry_name = get_file_name_lossy(image_path);

        let file = fs::File::open(image_path).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to open file '{}' for backup: {}",
                    path_to_string_lossy(image_path),
                    e
                ),
            ))
        })?;

        let file_std = file.into_std().await;
        let options = self.options;

        let zip = match self.zip.as_mut() {
            Some(z) => z,
            None => {
                return Err(Error::Other("Zip writer not available".to_string()));
            }
        };

        // Create the read-only memory map
        let mmap = spawn_blocking(move || unsafe { MmapOptions::new().map(&file_std) }).await??;

        zip.start_file(entry_name, options)?;
        zip.write_all(&mmap[..])?;

        Ok(self)
    }

    async fn save(mut self) -> Result<()> {
        let zip = match self.zip.take() {
            Some(z) => z,
            None => {
                return Err(Error::Other("Zip writer not available".to_string()));
            }
        };

        spawn_blocking(move || match zip.finish() {
            Ok(_) => Ok(()),
            Err(e) => Err(Error::Zip(e)),
        })
        .await??;

        Ok(())
    }
}
