//! High-level image operations.
//!
//! These functions combine settings, metadata and the backend: they decide
//! the caption text, describe the render, and hand it to the backend.

use super::backend::{BackendError, Dimensions, ImageBackend, ImageMetadata};
use super::params::{Caption, CaptionStyle, Quality, RenderParams};
use crate::config::{CaptionSource, Settings};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Build the caption text for one image.
///
/// ```text
/// Directory   → "Berlin"
/// Description → "Brandenburg Gate"        ("Berlin" without a description)
/// Both        → "Berlin - Brandenburg Gate" ("Berlin" without a description)
/// ```
pub fn compose_caption(
    dir_caption: &str,
    description: Option<&str>,
    source: CaptionSource,
    separator: &str,
) -> String {
    let description = description.map(str::trim).filter(|d| !d.is_empty());
    match (source, description) {
        (CaptionSource::Directory, _) | (_, None) => dir_caption.to_string(),
        (CaptionSource::Description, Some(d)) => d.to_string(),
        (CaptionSource::Both, Some(d)) if dir_caption.is_empty() => d.to_string(),
        (CaptionSource::Both, Some(d)) => format!("{dir_caption}{separator}{d}"),
    }
}

/// Plan a render without executing it.
pub fn plan_render(
    source: &Path,
    output: &Path,
    dir_caption: &str,
    metadata: &ImageMetadata,
    settings: &Settings,
    work_dir: &Path,
) -> RenderParams {
    let caption = settings.caption.enabled.then(|| {
        let text = compose_caption(
            dir_caption,
            metadata.description.as_deref(),
            settings.caption.source,
            &settings.caption.separator,
        );
        Caption {
            text,
            style: CaptionStyle::from_settings(&settings.caption, settings.font_path(work_dir)),
        }
    });

    RenderParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        bounds: (settings.output.size[0], settings.output.size[1]),
        orientation: metadata.orientation,
        quality: Quality::new(settings.output.quality),
        max_pixels: settings.output.max_pixels,
        caption: caption.filter(|c| !c.text.is_empty()),
    }
}

/// Convert a single image: read metadata, plan, render.
///
/// Returns the plan that was executed and the output dimensions.
pub fn convert_image(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    dir_caption: &str,
    settings: &Settings,
    work_dir: &Path,
) -> Result<(RenderParams, Dimensions)> {
    let metadata = backend.read_metadata(source)?;
    if metadata.orientation.is_none() {
        tracing::debug!(source = %source.display(), "no orientation tag, assuming upright");
    }
    let params = plan_render(source, output, dir_caption, &metadata, settings, work_dir);
    let dims = backend.render(&params)?;
    Ok((params, dims))
}
