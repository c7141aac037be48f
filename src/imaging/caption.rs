//! Caption rendering onto a decoded image.
//!
//! The caption sits in the bottom-right corner. Its font shrinks until the
//! text fits into a fraction of the image width, and its colour is chosen
//! from the brightness of the pixels it will cover: bright text over dark
//! areas, dark text over bright ones.

use super::backend::BackendError;
use super::calculations::{caption_origin, fit_font_size, max_caption_width, pick_text_color};
use super::params::CaptionStyle;
use ab_glyph::{FontVec, PxScale};
use image::RgbImage;
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> Result<FontVec, BackendError> {
    let bytes = std::fs::read(path).map_err(|e| {
        BackendError::Font(format!("cannot read font {}: {}", path.display(), e))
    })?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| BackendError::Font(format!("invalid font {}: {}", path.display(), e)))
}

/// Rendered width and height of `text` at `size` points.
pub fn measure(font: &FontVec, size: u32, text: &str) -> (u32, u32) {
    text_size(PxScale::from(size as f32), font, text)
}

/// ITU-R 601 luma of one pixel, rounded (the classic `L` conversion).
fn luma_601(p: &image::Rgb<u8>) -> u32 {
    let [r, g, b] = p.0;
    (299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000
}

/// Mean luma (0–255) of the pixels inside a region.
///
/// The region is clamped to the image; an empty region yields 0.
pub fn mean_luminance(image: &RgbImage, origin: (u32, u32), size: (u32, u32)) -> f32 {
    let (img_w, img_h) = image.dimensions();
    let x = origin.0.min(img_w);
    let y = origin.1.min(img_h);
    let w = size.0.min(img_w - x);
    let h = size.1.min(img_h - y);
    if w == 0 || h == 0 {
        return 0.0;
    }

    let region = image::imageops::crop_imm(image, x, y, w, h).to_image();
    let sum: u64 = region.pixels().map(|p| luma_601(p) as u64).sum();
    (sum as f64 / (w as u64 * h as u64) as f64) as f32
}

/// Where and how a caption will be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionLayout {
    pub font_size: u32,
    pub origin: (u32, u32),
    pub text_size: (u32, u32),
    pub color: super::params::Rgb,
}

/// Compute font size, position and colour for a caption on `image`.
pub fn layout_caption(
    image: &RgbImage,
    font: &FontVec,
    text: &str,
    style: &CaptionStyle,
) -> CaptionLayout {
    let (img_w, img_h) = image.dimensions();
    let max_width = max_caption_width(img_w, style.max_width_fraction);
    let font_size = fit_font_size(style.initial_size, style.min_size, max_width, |size| {
        measure(font, size, text).0
    });
    let text_size = measure(font, font_size, text);
    let origin = caption_origin((img_w, img_h), text_size, style.border);
    let luminance = mean_luminance(image, origin, text_size);
    let color = pick_text_color(luminance, style.luminance_threshold, style.bright, style.dark);

    CaptionLayout {
        font_size,
        origin,
        text_size,
        color,
    }
}

/// Draw `text` onto `image` following `style`.
pub fn draw_caption(
    image: &mut RgbImage,
    text: &str,
    style: &CaptionStyle,
) -> Result<CaptionLayout, BackendError> {
    let font = load_font(&style.font)?;
    let layout = layout_caption(image, &font, text, style);
    tracing::debug!(
        text,
        font_size = layout.font_size,
        x = layout.origin.0,
        y = layout.origin.1,
        "drawing caption"
    );
    draw_text_mut(
        image,
        image::Rgb(layout.color.0),
        layout.origin.0 as i32,
        layout.origin.1 as i32,
        PxScale::from(layout.font_size as f32),
        &font,
        text,
    );
    Ok(layout)
}
