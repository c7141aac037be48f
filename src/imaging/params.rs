//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to render) and the [`backend`](super::backend) (which
//! does the pixel work), so the batch driver can be tested with a mock.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1–100, default 90). Clamped on construction.
//! - [`Orientation`]: the eight EXIF orientation values.
//! - [`Rgb`]: caption colour.
//! - [`CaptionStyle`]: font and placement rules for the caption.
//! - [`RenderParams`]: everything needed to turn one source into one target.

use crate::config::CaptionSettings;
use std::path::PathBuf;

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// EXIF orientation (tag `0x0112`).
///
/// Names describe the transform needed to display the stored pixels upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// 1
    Normal,
    /// 2
    FlipHorizontal,
    /// 3
    Rotate180,
    /// 4
    FlipVertical,
    /// 5: mirror along the main diagonal
    Transpose,
    /// 6
    Rotate90,
    /// 7: mirror along the anti-diagonal
    Transverse,
    /// 8
    Rotate270,
}

impl Orientation {
    /// Map a raw EXIF value. Out-of-range values are `None`.
    pub fn from_exif(value: u16) -> Option<Self> {
        Some(match value {
            1 => Self::Normal,
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            _ => return None,
        })
    }

    /// Whether applying this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Transpose | Self::Rotate90 | Self::Transverse | Self::Rotate270
        )
    }
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

/// How to size, place and colour a caption.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    pub font: PathBuf,
    pub initial_size: u32,
    pub min_size: u32,
    pub border: (u32, u32),
    pub max_width_fraction: f32,
    pub bright: Rgb,
    pub dark: Rgb,
    pub luminance_threshold: f32,
}

impl CaptionStyle {
    /// Build a style from settings, with the font resolved to `font`.
    pub fn from_settings(settings: &CaptionSettings, font: PathBuf) -> Self {
        Self {
            font,
            initial_size: settings.initial_size,
            min_size: settings.min_size,
            border: (settings.border[0], settings.border[1]),
            max_width_fraction: settings.max_width_fraction,
            bright: Rgb(settings.bright_color),
            dark: Rgb(settings.dark_color),
            luminance_threshold: settings.luminance_threshold,
        }
    }
}

/// Caption text plus the style to draw it with.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub style: CaptionStyle,
}

/// Everything needed to convert one image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Bounding box `(width, height)` the result must fit into.
    pub bounds: (u32, u32),
    pub orientation: Option<Orientation>,
    pub quality: Quality,
    pub max_pixels: u64,
    pub caption: Option<Caption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }

    #[test]
    fn orientation_from_exif_values() {
        assert_eq!(Orientation::from_exif(1), Some(Orientation::Normal));
        assert_eq!(Orientation::from_exif(3), Some(Orientation::Rotate180));
        assert_eq!(Orientation::from_exif(6), Some(Orientation::Rotate90));
        assert_eq!(Orientation::from_exif(8), Some(Orientation::Rotate270));
        assert_eq!(Orientation::from_exif(0), None);
        assert_eq!(Orientation::from_exif(9), None);
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        let swapping: Vec<u16> = (1..=8)
            .filter(|&v| Orientation::from_exif(v).unwrap().swaps_dimensions())
            .collect();
        assert_eq!(swapping, vec![5, 6, 7, 8]);
    }

    #[test]
    fn style_from_default_settings() {
        let style = CaptionStyle::from_settings(&CaptionSettings::default(), "f.ttf".into());
        assert_eq!(style.border, (50, 50));
        assert_eq!(style.bright, Rgb([240, 240, 240]));
        assert_eq!(style.dark, Rgb([16, 16, 16]));
        assert_eq!(style.font, PathBuf::from("f.ttf"));
    }
}
