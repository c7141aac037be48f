//! Pure calculation functions for image geometry and caption layout.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{Orientation, Rgb};

/// Scale `source` down to fit inside `bounds`, preserving aspect ratio.
///
/// Images already inside the box are returned unchanged (never enlarged).
/// Neither returned dimension is ever zero.
///
/// ```text
/// 4000x3000 into 1024x600 → 800x600   (height-bound)
/// 3000x1000 into 1024x600 → 1024x341  (width-bound)
/// 640x480   into 1024x600 → 640x480   (already fits)
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}

/// Dimensions after applying an EXIF orientation.
pub fn oriented_dimensions(dims: (u32, u32), orientation: Option<Orientation>) -> (u32, u32) {
    match orientation {
        Some(o) if o.swaps_dimensions() => (dims.1, dims.0),
        _ => dims,
    }
}

/// Find the font size for a caption.
///
/// Starts at `initial` and shrinks one step at a time until `measure(size)`
/// (the rendered text width) is at most `max_width`, or `min` is reached.
pub fn fit_font_size(initial: u32, min: u32, max_width: u32, measure: impl Fn(u32) -> u32) -> u32 {
    let mut size = initial;
    while size > min && measure(size) > max_width {
        size -= 1;
    }
    size
}

/// Largest caption width allowed for an image of `image_width` pixels.
pub fn max_caption_width(image_width: u32, fraction: f32) -> u32 {
    (image_width as f64 * fraction as f64).floor() as u32
}

/// Top-left corner of a caption anchored to the bottom-right corner.
///
/// Clamped to the image so an oversized caption starts at the left/top edge
/// instead of outside it.
pub fn caption_origin(image: (u32, u32), text: (u32, u32), border: (u32, u32)) -> (u32, u32) {
    (
        image.0.saturating_sub(text.0).saturating_sub(border.0),
        image.1.saturating_sub(text.1).saturating_sub(border.1),
    )
}

/// Pick the caption colour that stands out from the area beneath it.
pub fn pick_text_color(mean_luminance: f32, threshold: f32, bright: Rgb, dark: Rgb) -> Rgb {
    if mean_luminance < threshold {
        bright
    } else {
        dark
    }
}
