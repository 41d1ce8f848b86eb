//! Unit tests for core Seihon functionality.
//!
//! Tests individual components in isolation without full pipeline execution.

use seihon::assembler::PdfAssembler;
use seihon::error::{Error, Result};
use seihon::prelude::*;
use tokio::fs;

mod common;
use common::{
    CollectingReporter, assert_valid_pdf_file, create_corrupt_image, create_dummy_color_image,
    create_dummy_grayscale_image, setup_test_dirs,
};

#[test]
fn test_settings_builder_validation() {
    // Quality outside 1..=100 fails validation
    let result = ConversionSettings::builder().pdf_quality(0u8).build();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("pdf_quality"));

    let result = ConversionSettings::builder().pdf_quality(101u8).build();
    assert!(result.is_err());

    let result = ConversionSettings::builder().max_width(0u32).build();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("max_width"));

    let result = ConversionSettings::builder().max_height(0u32).build();
    assert!(result.is_err());
}

#[test]
fn test_settings_defaults() -> Result<()> {
    let settings = ConversionSettings::builder().build()?;
    assert_eq!(settings.image_processing, ImageProcessing::KeepOriginal);
    assert_eq!(settings.pdf_quality, 85);
    assert!(settings.pdf_compression);
    assert!(!settings.resize_images);
    assert_eq!(settings.max_width, 1920);
    assert_eq!(settings.max_height, 1080);
    assert!(settings.output_folder.is_none());
    assert!(!settings.auto_open_pdf);
    assert!(!settings.backup_originals);
    assert!(!settings.delete_after_conversion);
    Ok(())
}

#[test]
fn test_collector_supported_extensions() {
    for name in [
        "a.png", "a.jpg", "a.JPG", "a.jpeg", "a.bmp", "a.gif", "a.tiff", "a.WEBP",
    ] {
        assert!(
            ImageCollector::is_supported_image(Path::new(name)),
            "{} should be supported",
            name
        );
    }
    for name in ["a.txt", "a.pdf", "a.zip", "noext", "a.jpg.bak"] {
        assert!(
            !ImageCollector::is_supported_image(Path::new(name)),
            "{} should not be supported",
            name
        );
    }
}

#[tokio::test]
async fn test_collector_orders_files_then_subdirectories() -> Result<()> {
    let dirs = setup_test_dirs("collector_order").await;
    let folder = dirs.source_dir.join("Chapter 1");

    // Created out of order on purpose; collection must sort
    create_dummy_color_image(&folder.join("002.jpg")).await?;
    create_dummy_color_image(&folder.join("001.jpg")).await?;
    create_dummy_color_image(&folder.join("extras").join("004.jpg")).await?;
    create_dummy_color_image(&folder.join("extras").join("003.jpg")).await?;
    fs::write(folder.join("info.txt"), b"not an image").await?;

    let images = ImageCollector::collect_folder(&folder).await?;
    assert_eq!(
        images,
        vec![
            folder.join("001.jpg"),
            folder.join("002.jpg"),
            folder.join("extras").join("003.jpg"),
            folder.join("extras").join("004.jpg"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_collector_group_concatenates_in_folder_order() -> Result<()> {
    let dirs = setup_test_dirs("collector_group_order").await;
    let folder_a = dirs.source_dir.join("A");
    let folder_b = dirs.source_dir.join("B");

    create_dummy_color_image(&folder_a.join("a1.jpg")).await?;
    create_dummy_color_image(&folder_a.join("a2.jpg")).await?;
    create_dummy_grayscale_image(&folder_b.join("b1.jpg")).await?;

    let reporter = CollectingReporter::default();
    let images =
        ImageCollector::collect_group(&[folder_a.clone(), folder_b.clone()], &reporter).await;

    // Concatenation order is the page order: [a1, a2, b1]
    assert_eq!(
        images,
        vec![
            folder_a.join("a1.jpg"),
            folder_a.join("a2.jpg"),
            folder_b.join("b1.jpg"),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_collector_group_tolerates_unreadable_folder() -> Result<()> {
    let dirs = setup_test_dirs("collector_unreadable").await;
    let folder_a = dirs.source_dir.join("A");
    let missing = dirs.source_dir.join("missing");
    create_dummy_color_image(&folder_a.join("a1.jpg")).await?;

    let reporter = CollectingReporter::default();
    let images = ImageCollector::collect_group(&[missing, folder_a.clone()], &reporter).await;

    assert_eq!(images, vec![folder_a.join("a1.jpg")]);
    assert!(!reporter.warnings().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_cleaner_removes_nested_empty_directories() -> Result<()> {
    let dirs = setup_test_dirs("cleaner_empty").await;
    let root = dirs.source_dir.join("emptied");
    fs::create_dir_all(root.join("a").join("b")).await?;
    fs::create_dir_all(root.join("c")).await?;

    let removed = DirectoryCleaner::cleanup(&root).await;
    assert!(removed);
    assert!(!root.exists());
    Ok(())
}

#[tokio::test]
async fn test_cleaner_keeps_directories_with_files() -> Result<()> {
    let dirs = setup_test_dirs("cleaner_files").await;
    let root = dirs.source_dir.join("occupied");
    fs::create_dir_all(root.join("empty")).await?;
    create_dummy_color_image(&root.join("kept").join("page.jpg")).await?;

    let removed = DirectoryCleaner::cleanup(&root).await;
    assert!(!removed);
    assert!(root.exists());
    assert!(root.join("kept").join("page.jpg").exists());
    // The empty sibling is still swept
    assert!(!root.join("empty").exists());
    Ok(())
}

#[tokio::test]
async fn test_assembler_empty_input_is_skipped() -> Result<()> {
    let dirs = setup_test_dirs("assembler_empty").await;
    let settings = ConversionSettings::builder().build()?;
    let reporter = CollectingReporter::default();
    let assembler = PdfAssembler::new(&settings, &reporter);

    let outcome = assembler
        .assemble(&[], &dirs.target_dir.join("empty.pdf"), false)
        .await?;

    assert!(matches!(outcome, ConversionOutcome::Skipped { .. }));
    assert!(!dirs.target_dir.join("empty.pdf").exists());
    Ok(())
}

#[tokio::test]
async fn test_assembler_page_count_matches_input() -> Result<()> {
    let dirs = setup_test_dirs("assembler_pages").await;
    let mut images = Vec::new();
    for i in 1..=4 {
        let path = dirs.source_dir.join(format!("{:03}.jpg", i));
        create_dummy_color_image(&path).await?;
        images.push(path);
    }

    let settings = ConversionSettings::builder().build()?;
    let reporter = CollectingReporter::default();
    let assembler = PdfAssembler::new(&settings, &reporter);

    let output = dirs.target_dir.join("four_pages.pdf");
    let outcome = assembler.assemble(&images, &output, false).await?;

    match outcome {
        ConversionOutcome::Created { path, page_count } => {
            assert_eq!(path, output);
            assert_eq!(page_count, 4);
        }
        other => panic!("expected Created outcome, got {:?}", other),
    }
    assert_valid_pdf_file(&output).await;
    Ok(())
}

#[tokio::test]
async fn test_assembler_skips_corrupt_images() -> Result<()> {
    let dirs = setup_test_dirs("assembler_corrupt").await;
    let good = dirs.source_dir.join("001.jpg");
    let bad = dirs.source_dir.join("002.jpg");
    create_dummy_color_image(&good).await?;
    create_corrupt_image(&bad).await?;

    let settings = ConversionSettings::builder().build()?;
    let reporter = CollectingReporter::default();
    let assembler = PdfAssembler::new(&settings, &reporter);

    let output = dirs.target_dir.join("partial.pdf");
    let outcome = assembler
        .assemble(&[good.clone(), bad.clone()], &output, false)
        .await?;

    match outcome {
        ConversionOutcome::Created { page_count, .. } => assert_eq!(page_count, 1),
        other => panic!("expected Created outcome, got {:?}", other),
    }
    assert!(reporter.warnings().iter().any(|w| w.contains("002.jpg")));
    Ok(())
}

#[tokio::test]
async fn test_assembler_all_corrupt_is_hard_error() -> Result<()> {
    let dirs = setup_test_dirs("assembler_all_corrupt").await;
    let bad = dirs.source_dir.join("001.jpg");
    create_corrupt_image(&bad).await?;

    let settings = ConversionSettings::builder().build()?;
    let reporter = CollectingReporter::default();
    let assembler = PdfAssembler::new(&settings, &reporter);

    let output = dirs.target_dir.join("invalid.pdf");
    let result = assembler.assemble(&[bad], &output, false).await;

    assert!(matches!(result, Err(Error::NoValidImages(_))));
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_assembler_resize_never_enlarges() -> Result<()> {
    let dirs = setup_test_dirs("assembler_resize").await;
    // Dummy images are 100x100, well inside the 50x50 bound after shrinking
    let image = dirs.source_dir.join("001.jpg");
    create_dummy_color_image(&image).await?;

    let settings = ConversionSettings::builder()
        .resize_images(true)
        .max_width(50u32)
        .max_height(50u32)
        .image_processing(ImageProcessing::Jpeg)
        .pdf_quality(70u8)
        .build()?;
    let reporter = CollectingReporter::default();
    let assembler = PdfAssembler::new(&settings, &reporter);

    let output = dirs.target_dir.join("resized.pdf");
    let outcome = assembler.assemble(&[image], &output, false).await?;

    assert!(matches!(
        outcome,
        ConversionOutcome::Created { page_count: 1, .. }
    ));
    assert_valid_pdf_file(&output).await;
    Ok(())
}

#[tokio::test]
async fn test_session_preflight_check() -> Result<()> {
    let dirs = setup_test_dirs("session_preflight").await;
    let settings = ConversionSettings::builder().build()?;

    // Valid root
    let session = ConversionSession::new(dirs.source_dir.clone(), false, settings.clone());
    assert!(session.preflight_check().is_ok());

    // Missing root
    let session = ConversionSession::new(
        dirs.source_dir.join("nonexistent"),
        false,
        settings.clone(),
    );
    let result = session.preflight_check();
    assert!(result.is_err());
    assert!(
        result
            .err()
            .unwrap()
            .to_string()
            .contains("Source root does not exist")
    );

    // Root is a file, not a directory
    let file_root = dirs.source_dir.join("file.txt");
    fs::write(&file_root, b"not a directory").await?;
    let session = ConversionSession::new(file_root, false, settings);
    let result = session.preflight_check();
    assert!(result.is_err());
    assert!(
        result
            .err()
            .unwrap()
            .to_string()
            .contains("not a directory")
    );
    Ok(())
}
