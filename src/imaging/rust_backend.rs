//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode JPEG | `image::ImageReader` |
//! | Orientation | `DynamicImage::rotate90/180/270`, `fliph`, `flipv` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Caption | `imageproc::drawing::draw_text_mut` + `ab_glyph` |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | EXIF metadata | custom [`exif_parser`](super::exif_parser) (JPEG APP1 + TIFF IFD0) |

use super::backend::{BackendError, Dimensions, ImageBackend, ImageMetadata};
use super::calculations::fit_within;
use super::caption::draw_caption;
use super::params::{Orientation, RenderParams};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, refusing oversized inputs before
/// any pixel buffer is allocated.
fn load_image(path: &Path, max_pixels: u64) -> Result<DynamicImage, BackendError> {
    let (width, height) = image::image_dimensions(path).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to read {}: {}", path.display(), e))
    })?;
    if width as u64 * height as u64 > max_pixels {
        return Err(BackendError::TooLarge {
            width,
            height,
            max_pixels,
        });
    }

    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Turn stored pixels upright according to the EXIF orientation.
fn apply_orientation(img: DynamicImage, orientation: Option<Orientation>) -> DynamicImage {
    match orientation {
        None | Some(Orientation::Normal) => img,
        Some(Orientation::FlipHorizontal) => img.fliph(),
        Some(Orientation::Rotate180) => img.rotate180(),
        Some(Orientation::FlipVertical) => img.flipv(),
        Some(Orientation::Transpose) => img.rotate90().fliph(),
        Some(Orientation::Rotate90) => img.rotate90(),
        Some(Orientation::Transverse) => img.rotate270().fliph(),
        Some(Orientation::Rotate270) => img.rotate270(),
    }
}

/// Sibling path used while encoding, renamed over the target on success.
fn partial_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    output.with_file_name(name)
}

/// Encode as JPEG and move into place.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let tmp = partial_path(path);
    let result: Result<(), BackendError> = (|| {
        let file = std::fs::File::create(&tmp)?;
        let writer = std::io::BufWriter::new(file);
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8);
        img.write_with_encoder(encoder)
            .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    })();
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn read_metadata(&self, path: &Path) -> Result<ImageMetadata, BackendError> {
        let exif = super::exif_parser::read_exif(path);
        Ok(ImageMetadata {
            orientation: exif.orientation.and_then(Orientation::from_exif),
            description: exif.description,
        })
    }

    fn render(&self, params: &RenderParams) -> Result<Dimensions, BackendError> {
        let img = load_image(&params.source, params.max_pixels)?;
        let img = apply_orientation(img, params.orientation);

        let (width, height) = fit_within((img.width(), img.height()), params.bounds);
        let img = if (width, height) == (img.width(), img.height()) {
            img
        } else {
            img.resize_exact(width, height, FilterType::Lanczos3)
        };

        let mut rgb = img.into_rgb8();
        if let Some(caption) = &params.caption {
            draw_caption(&mut rgb, &caption.text, &caption.style)?;
        }

        save_jpeg(
            &DynamicImage::ImageRgb8(rgb),
            &params.output,
            params.quality.value(),
        )?;
        Ok(Dimensions { width, height })
    }
}
