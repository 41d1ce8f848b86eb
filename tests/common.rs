//! Common test utilities and constants for the Seihon crate.
//!
//! Provides functions for setting up and tearing down test directories,
//! creating dummy image files, an event-collecting progress reporter, and
//! shared test constants.

use image::{Rgb, RgbImage};
use rand::{Rng, distributions::Alphanumeric};
use seihon::error::{Error, Result};
use seihon::report::{ProgressEvent, ProgressReporter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::fs;

#[allow(dead_code)]
pub const TEST_TMP_DIR: &str = "tests/tmp";
#[allow(dead_code)]
pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);
#[allow(dead_code)]
pub const LONG_TEST_TIMEOUT: Duration = Duration::from_secs(120); // For full conversions if they are slow

/// Paths of one isolated test sandbox.
#[allow(dead_code)]
pub struct TestDirs {
    pub base_dir: PathBuf,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
}

/// Helper function to create a clean test directory with source and target subdirectories.
/// Ensures the base directory is empty before a test runs.
#[allow(dead_code)]
pub async fn setup_test_dirs(sub_path: &str) -> TestDirs {
    let rand_string: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    let unique_sub_path = format!("{}-{}", sub_path, rand_string);
    let base_dir = PathBuf::from(TEST_TMP_DIR).join(unique_sub_path);
    if base_dir.exists() {
        fs::remove_dir_all(&base_dir).await.unwrap();
    }
    let source_dir = base_dir.join("source");
    let target_dir = base_dir.join("target");

    fs::create_dir_all(&source_dir).await.unwrap();
    fs::create_dir_all(&target_dir).await.unwrap();

    TestDirs {
        base_dir,
        source_dir,
        target_dir,
    }
}

/// Creates a minimal dummy JPEG image at the given path.
#[allow(dead_code)]
pub async fn create_dummy_image(path: &Path, color: Rgb<u8>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let mut img = RgbImage::new(100, 100);
    for x in 0..100 {
        for y in 0..100 {
            img.put_pixel(x, y, color);
        }
    }
    let path_clone = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let format = image::ImageFormat::from_path(&path_clone)
            .unwrap_or(image::ImageFormat::Jpeg);
        img.save_with_format(path_clone, format)
    })
    .await
    .map_err(Error::Join)?
    .map_err(Error::Image)?;
    Ok(())
}

/// Creates a dummy grayscale JPEG image at the given path.
#[allow(dead_code)]
pub async fn create_dummy_grayscale_image(path: &Path) -> Result<()> {
    create_dummy_image(path, Rgb([128, 128, 128])).await
}

/// Creates a dummy color JPEG image at the given path.
#[allow(dead_code)]
pub async fn create_dummy_color_image(path: &Path) -> Result<()> {
    create_dummy_image(path, Rgb([255, 0, 0])).await // Red
}

/// Writes a file with an image extension but non-image content.
#[allow(dead_code)]
pub async fn create_corrupt_image(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, b"this is not image data").await?;
    Ok(())
}

/// Checks that a PDF file exists and starts with the PDF magic bytes.
#[allow(dead_code)]
pub async fn assert_valid_pdf_file(path: &Path) {
    assert!(path.exists(), "Output PDF file does not exist: {:?}", path);
    assert!(path.is_file(), "Output PDF path is not a file: {:?}", path);

    let content = fs::read(path).await.unwrap();
    assert!(
        content.starts_with(b"%PDF"),
        "Output file is not a PDF: {:?}",
        path
    );
}

/// Checks that a ZIP file exists and returns its entry count.
#[allow(dead_code)]
pub async fn assert_valid_zip_file(path: &Path) -> usize {
    assert!(path.exists(), "Output ZIP file does not exist: {:?}", path);
    assert!(path.is_file(), "Output ZIP path is not a file: {:?}", path);

    let file = fs::File::open(path).await.unwrap();
    let file_std = file.into_std().await;
    let zip = zip::ZipArchive::new(file_std).unwrap();
    assert!(zip.len() > 0, "Output ZIP file is empty: {:?}", path);
    zip.len()
}

/// Reporter that records every event for later assertions.
#[allow(dead_code)]
#[derive(Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

#[allow(dead_code)]
impl CollectingReporter {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Warning { message } => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl ProgressReporter for CollectingReporter {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}
