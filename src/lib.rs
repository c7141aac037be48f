//! # Photoframe Scale
//!
//! Prepares folders of photos for a digital picture frame. Every directory
//! whose name starts with the topic prefix (`_` by default) is a topic; its
//! JPEGs are turned upright, scaled to fit the frame, captioned with the
//! topic name, and written to a sibling directory without the prefix.
//!
//! ```text
//! photos/_Berlin/IMG_0001.jpg  →  photos/Berlin/IMG_0001.jpg
//! ```
//!
//! Conversion is incremental: an image whose target is at least as new as
//! the source is skipped.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Finds topic directories and their images |
//! | [`process`] | Batch driver: freshness check, convert, report progress |
//! | [`cache`] | Modification-time comparison and run statistics |
//! | [`imaging`] | Pure-Rust image operations: EXIF, orient, resize, caption, encode |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`naming`] | Topic prefix and target directory naming rules |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Timestamps Over Content Hashes
//!
//! The frame is fed from a single working directory that only this tool
//! writes to, so comparing modification times is enough to tell whether a
//! target is current. Equal times count as up to date.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling (Lanczos3) and encoding use the `image` crate;
//! captions are drawn with `imageproc` on top of `ab_glyph` fonts. No system
//! libraries are needed at runtime beyond the caption font itself.
//!
//! ## Failures Stay Local
//!
//! A corrupt photo, a missing font or a full disk affects only the file being
//! converted. The run logs the error, counts it, and moves on. Only an
//! unusable working directory or an invalid `config.toml` stops a run.

pub mod cache;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
