//! Settings loading, merging, and validation.
//!
//! Every tunable of the conversion lives in [`Settings`]. The stock defaults
//! reproduce the classic 1024x600 photo frame setup; a `config.toml` in the
//! working directory overrides any subset of them:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! topic_prefix = "_"          # Marks source directories (_Berlin → Berlin)
//!
//! [output]
//! size = [1024, 600]          # Bounding box, width x height
//! quality = 90                # JPEG quality (1-100)
//! max_pixels = 89478485       # Refuse to decode anything larger
//!
//! [caption]
//! enabled = true
//! source = "directory"        # "directory", "description" or "both"
//! separator = " - "           # Joins directory name and description
//! font = "fonts/LHANDW.TTF"   # Relative to the working directory
//! initial_size = 32
//! min_size = 8
//! border = [50, 50]           # Distance from the bottom-right corner
//! max_width_fraction = 0.5    # Caption may use at most this share of the width
//! bright_color = [240, 240, 240]
//! dark_color = [16, 16, 16]
//! luminance_threshold = 128   # Below: bright text, otherwise dark text
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the settings file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// All conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory name prefix that marks a topic directory.
    pub topic_prefix: String,
    /// Output image geometry and encoding.
    pub output: OutputSettings,
    /// Caption text, font and colours.
    pub caption: CaptionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            topic_prefix: "_".to_string(),
            output: OutputSettings::default(),
            caption: CaptionSettings::default(),
        }
    }
}

impl Settings {
    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topic_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "topic_prefix must not be empty".into(),
            ));
        }
        if self.output.size[0] == 0 || self.output.size[1] == 0 {
            return Err(ConfigError::Validation(
                "output.size values must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.output.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "output.max_pixels must be non-zero".into(),
            ));
        }
        let caption = &self.caption;
        if caption.min_size == 0 || caption.min_size > caption.initial_size {
            return Err(ConfigError::Validation(
                "caption.min_size must be between 1 and caption.initial_size".into(),
            ));
        }
        if !(caption.max_width_fraction > 0.0 && caption.max_width_fraction <= 1.0) {
            return Err(ConfigError::Validation(
                "caption.max_width_fraction must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the font path against the working directory.
    pub fn font_path(&self, work_dir: &Path) -> PathBuf {
        work_dir.join(&self.caption.font)
    }
}

/// Output image geometry and encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Bounding box as `[width, height]`.
    pub size: [u32; 2],
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Largest source image (in pixels) we agree to decode.
    pub max_pixels: u64,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            size: [1024, 600],
            quality: 90,
            max_pixels: 89_478_485,
        }
    }
}

/// Where the caption text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionSource {
    /// The topic name only.
    #[default]
    Directory,
    /// The EXIF image description, falling back to the topic name.
    Description,
    /// Topic name and EXIF description joined by the separator.
    Both,
}

/// Caption settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionSettings {
    pub enabled: bool,
    pub source: CaptionSource,
    pub separator: String,
    /// Font file, relative to the working directory unless absolute.
    pub font: PathBuf,
    pub initial_size: u32,
    pub min_size: u32,
    /// Distance from the right and bottom edges, `[x, y]`.
    pub border: [u32; 2],
    pub max_width_fraction: f32,
    pub bright_color: [u8; 3],
    pub dark_color: [u8; 3],
    pub luminance_threshold: f32,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            source: CaptionSource::Directory,
            separator: " - ".to_string(),
            font: PathBuf::from("fonts/LHANDW.TTF"),
            initial_size: 32,
            min_size: 8,
            border: [50, 50],
            max_width_fraction: 0.5,
            bright_color: [240, 240, 240],
            dark_color: [16, 16, 16],
            luminance_threshold: 128.0,
        }
    }
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Returns the stock defaults as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Settings::default()).expect("default settings must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse settings from a TOML string layered over the stock defaults.
pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value(), overlay);
    let settings: Settings = merged.try_into()?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from `config.toml` in the working directory.
///
/// A missing file yields the stock defaults.
pub fn load_settings(work_dir: &Path) -> Result<Settings, ConfigError> {
    let path = work_dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(Settings::default());
    }
    tracing::debug!(path = %path.display(), "loading settings");
    let content = fs::read_to_string(&path)?;
    parse_settings(&content)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photoframe-scale configuration
# ==============================
#
# Place this file as config.toml in the working directory.
# All options are optional; uncommented values below are the defaults.

# Source directories start with this prefix. "_Berlin" is converted into
# "Berlin"; the caption defaults to the target directory name.
topic_prefix = "_"

[output]
# Bounding box of the frame, [width, height]. Images are scaled down to fit
# while keeping their aspect ratio. Smaller images are never enlarged.
size = [1024, 600]
# JPEG encoding quality, 1-100.
quality = 90
# Images with more pixels than this are skipped instead of decoded.
max_pixels = 89478485

[caption]
enabled = true
# "directory"   - the topic name
# "description" - the EXIF image description (topic name if there is none)
# "both"        - topic name, separator, description
source = "directory"
separator = " - "
# TrueType/OpenType font, relative to the working directory.
font = "fonts/LHANDW.TTF"
# The font shrinks one point at a time from initial_size until the caption
# fits into max_width_fraction of the image width, stopping at min_size.
initial_size = 32
min_size = 8
max_width_fraction = 0.5
# Distance of the caption from the bottom-right corner, [x, y].
border = [50, 50]
# The caption is drawn bright on dark areas and dark on bright areas.
bright_color = [240, 240, 240]
dark_color = [16, 16, 16]
# Mean luma (0-255) under the caption below which the bright color is used.
luminance_threshold = 128
"##
}
