//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **EXIF metadata** | custom parser (JPEG APP1 + TIFF IFD0) |
//! | **Orient + resize** | `rotate90/180/270` + Lanczos3 |
//! | **Caption** | `imageproc` text drawing with `ab_glyph` fonts |
//! | **Encode** | `image` JPEG encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry and caption layout (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Caption**: font loading, measuring and drawing
//! - **Operations**: High-level functions combining settings, metadata and backend

pub mod backend;
mod calculations;
pub mod caption;
pub(crate) mod exif_parser;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, ImageMetadata};
pub use calculations::{fit_within, oriented_dimensions};
pub use operations::{compose_caption, convert_image, plan_render};
pub use params::{Caption, CaptionStyle, Orientation, Quality, RenderParams, Rgb};
pub use rust_backend::RustBackend;
