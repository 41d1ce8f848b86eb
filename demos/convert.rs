//! Example demonstrating a full folder-to-PDF conversion session.
//!
//! Point it at a manga directory whose subfolders follow a volume naming
//! convention ("v1", "Vol. 2", "Volume 3 Chapter 1", ...) and it binds each
//! group into a PDF under `<parent>/PDF/<root name>/`.
//!
//! Usage: cargo run --example convert -- /path/to/manga/Series

use seihon::prelude::*;
use std::sync::Arc;

/// Reporter that prints every event instead of going through the log facade.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::SessionStarted { root, mode } => {
                println!("=== Converting {} ({:?} mode) ===", root.display(), mode);
            }
            ProgressEvent::GroupStarted {
                group,
                folder_count,
            } => {
                println!("-> group '{}' ({} folder(s))", group, folder_count);
            }
            ProgressEvent::ImagesFound { group, image_count } => {
                println!("   {} image(s) in '{}'", image_count, group);
            }
            ProgressEvent::GroupCompleted {
                group,
                path,
                page_count,
            } => {
                println!("   wrote {} ({} pages) for '{}'", path.display(), page_count, group);
            }
            ProgressEvent::GroupSkipped { group, reason } => {
                println!("   skipped '{}': {}", group, reason);
            }
            ProgressEvent::GroupFailed { group, error } => {
                println!("   FAILED '{}': {}", group, error);
            }
            ProgressEvent::Warning { message } => {
                println!("   warning: {}", message);
            }
            ProgressEvent::SessionCompleted {
                created,
                skipped,
                failed,
            } => {
                println!(
                    "=== Done: {} created, {} skipped, {} failed ===",
                    created, skipped, failed
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> seihon::error::Result<()> {
    let root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./manga".to_string());

    let settings = ConversionSettings::builder()
        .image_processing(ImageProcessing::Jpeg)
        .pdf_quality(85u8)
        .resize_images(true)
        .max_width(1920u32)
        .max_height(1080u32)
        .build()?;

    let summary = ConversionSession::new(root, false, settings)
        .with_reporter(Arc::new(ConsoleReporter))
        .process_hybrid()
        .await?;

    for outcome in &summary.outcomes {
        println!("{}: {:?}", outcome.group, outcome.outcome);
    }

    Ok(())
}
