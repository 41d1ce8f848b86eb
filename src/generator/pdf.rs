//! PDF document writer.
//!
//! Pages are decoded, normalized to RGB and optionally shrunk on a blocking
//! thread as they are added. The document itself is materialized at save time,
//! written to a staging file and renamed into place so a failed write never
//! leaves a partial document at the target path.

use async_trait::async_trait;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageFilter, ImageTransform, ImageXObject, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfPageIndex, Px,
};
use std::ffi::OsString;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tokio::task::spawn_blocking;

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::types::{ConversionSettings, ImageProcessing};

/// Render resolution used to map pixel dimensions onto page sizes.
const RENDER_DPI: f32 = 96.0;

/// A page after decode/resize/encode, ready to be embedded.
struct PreparedPage {
    width: u32,
    height: u32,
    data: Vec<u8>,
    filter: Option<ImageFilter>,
}

/// A generator that assembles one PDF document, one page per source image.
///
/// Page size equals the (possibly shrunk) pixel size of the image at a fixed
/// render DPI, so pages keep their native aspect ratio.
pub struct Pdf {
    output_path: PathBuf,
    title: String,
    processing: ImageProcessing,
    quality: u8,
    resize: bool,
    max_width: u32,
    max_height: u32,
    pages: Vec<PreparedPage>,
}

impl Pdf {
    /// Creates a PDF writer targeting `output_path`. The document title is
    /// derived from the output file stem.
    pub fn create(output_path: &Path, settings: &ConversionSettings) -> Result<Self> {
        let title = output_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        Ok(Self {
            output_path: output_path.to_path_buf(),
            title,
            processing: settings.image_processing,
            quality: settings.pdf_quality,
            resize: settings.resize_images,
            max_width: settings.max_width,
            max_height: settings.max_height,
            pages: Vec::new(),
        })
    }

    /// Number of pages added so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[async_trait]
impl Generator for Pdf {
    async fn add_page(&mut self, image_path: &Path) -> Result<&mut Self> {
        let path = image_path.to_path_buf();
        let processing = self.processing;
        let quality = self.quality;
        let resize = self.resize;
        let max_width = self.max_width;
        let max_height = self.max_height;

        // Decode and re-encode are CPU bound, keep them off the async runtime
        let page = spawn_blocking(move || {
            prepare_page(&path, processing, quality, resize, max_width, max_height)
        })
        .await??;

        self.pages.push(page);
        Ok(self)
    }

    async fn save(self) -> Result<()> {
        if self.pages.is_empty() {
            return Err(Error::DocumentWrite(
                self.output_path,
                "document has no pages".to_string(),
            ));
        }

        let output_path = self.output_path;
        let title = self.title;
        let pages = self.pages;

        spawn_blocking(move || write_document(&output_path, &title, pages)).await??;
        Ok(())
    }
}

fn prepare_page(
    path: &Path,
    processing: ImageProcessing,
    quality: u8,
    resize: bool,
    max_width: u32,
    max_height: u32,
) -> Result<PreparedPage> {
    let decoded = image::open(path)?;
    let mut rgb = decoded.into_rgb8();

    // Shrink-only: pages already inside the bounds are left untouched
    if resize && (rgb.width() > max_width || rgb.height() > max_height) {
        rgb = DynamicImage::ImageRgb8(rgb)
            .resize(max_width, max_height, FilterType::Lanczos3)
            .into_rgb8();
    }

    let (width, height) = rgb.dimensions();

    match processing {
        ImageProcessing::Jpeg => {
            let mut encoded = Vec::new();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, quality))?;
            Ok(PreparedPage {
                width,
                height,
                data: encoded,
                filter: Some(ImageFilter::DCT),
            })
        }
        // PDF has no native PNG stream; both variants embed the raw RGB
        // samples, which is the lossless representation
        ImageProcessing::Png | ImageProcessing::KeepOriginal => Ok(PreparedPage {
            width,
            height,
            data: rgb.into_raw(),
            filter: None,
        }),
    }
}

fn write_document(output_path: &Path, title: &str, pages: Vec<PreparedPage>) -> Result<()> {
    let mut remaining = pages.into_iter();
    let first = match remaining.next() {
        Some(page) => page,
        None => {
            return Err(Error::DocumentWrite(
                output_path.to_path_buf(),
                "document has no pages".to_string(),
            ));
        }
    };

    let (doc, page_index, layer_index) = PdfDocument::new(
        title,
        px_to_mm(first.width),
        px_to_mm(first.height),
        "Layer 1",
    );
    place_page(&doc, page_index, layer_index, first);

    for prepared in remaining {
        let (page_index, layer_index) = doc.add_page(
            px_to_mm(prepared.width),
            px_to_mm(prepared.height),
            "Layer 1",
        );
        place_page(&doc, page_index, layer_index, prepared);
    }

    let staging = staging_path(output_path);
    let file = File::create(&staging)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer)
        .map_err(|e| Error::DocumentWrite(output_path.to_path_buf(), e.to_string()))?;
    std::fs::rename(&staging, output_path)?;

    Ok(())
}

fn place_page(
    doc: &PdfDocumentReference,
    page_index: PdfPageIndex,
    layer_index: PdfLayerIndex,
    prepared: PreparedPage,
) {
    let layer = doc.get_page(page_index).get_layer(layer_index);

    let image = Image::from(ImageXObject {
        width: Px(prepared.width as usize),
        height: Px(prepared.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: prepared.data,
        image_filter: prepared.filter,
        clipping_bbox: None,
        smask: None,
    });

    image.add_to_layer(
        layer,
        ImageTransform {
            dpi: Some(RENDER_DPI),
            ..Default::default()
        },
    );
}

fn px_to_mm(px: u32) -> Mm {
    Mm(px as f32 / RENDER_DPI * 25.4)
}

fn staging_path(output_path: &Path) -> PathBuf {
    let mut name = output_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("output.pdf"));
    name.push(".tmp");
    output_path.with_file_name(name)
}
