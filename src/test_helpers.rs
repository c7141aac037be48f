//! Shared test utilities.
//!
//! Provides a populated working directory, lookup helpers for scan results,
//! synthetic JPEGs, and hand-built EXIF blocks.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_work_dir();
//! let topics = scan(tmp.path(), &Settings::default()).unwrap();
//!
//! assert_eq!(topic_names(&topics), vec!["_Berlin", "_Sea"]);
//! let berlin = find_topic(&topics, "_Berlin");
//! assert_eq!(berlin.images.len(), 2);
//! ```

use crate::scan::TopicDir;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a working directory with two topics and some noise:
///
/// ```text
/// _Berlin/a.jpg  _Berlin/b.JPEG  _Berlin/notes.txt
/// _Sea/c.jpg
/// archive/d.jpg
/// ```
pub fn setup_work_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    for dir in ["_Berlin", "_Sea", "archive"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    create_test_jpeg(&root.join("_Berlin/a.jpg"), 64, 48);
    create_test_jpeg(&root.join("_Berlin/b.JPEG"), 48, 64);
    fs::write(root.join("_Berlin/notes.txt"), "not a photo").unwrap();
    create_test_jpeg(&root.join("_Sea/c.jpg"), 80, 40);
    create_test_jpeg(&root.join("archive/d.jpg"), 32, 32);
    tmp
}

/// Write a gradient JPEG of the given size.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    JpegEncoder::new_with_quality(writer, 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Set a file's modification time.
pub fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

/// A TrueType font installed on this machine, if any.
///
/// Caption tests return early when this is `None`. `tests/convert.rs`
/// carries the same list.
pub fn system_font() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    CANDIDATES.iter().map(PathBuf::from).find(|p| p.is_file())
}

// =========================================================================
// Scan lookups: panic with a clear message on miss
// =========================================================================

/// Find a topic by directory name. Panics if not found.
pub fn find_topic<'a>(topics: &'a [TopicDir], name: &str) -> &'a TopicDir {
    topics.iter().find(|t| t.name == name).unwrap_or_else(|| {
        let names = topic_names(topics);
        panic!("topic '{name}' not found. Available: {names:?}")
    })
}

/// All topic directory names in scan order.
pub fn topic_names(topics: &[TopicDir]) -> Vec<&str> {
    topics.iter().map(|t| t.name.as_str()).collect()
}

// =========================================================================
// EXIF builders
// =========================================================================

/// Build a TIFF block whose IFD0 holds the given orientation and
/// description. Descriptions longer than 4 bytes (with NUL) are stored
/// after the IFD.
pub fn build_exif_tiff(
    orientation: Option<u16>,
    description: Option<&str>,
    big_endian: bool,
) -> Vec<u8> {
    let u16_bytes = |v: u16| {
        if big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    };
    let u32_bytes = |v: u32| {
        if big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    };

    let desc = description.map(|d| {
        let mut bytes = d.as_bytes().to_vec();
        bytes.push(0);
        bytes
    });
    let entry_count = description.is_some() as u16 + orientation.is_some() as u16;
    let ifd_offset = 8u32;
    let data_offset = ifd_offset + 2 + 12 * entry_count as u32 + 4;

    let mut out = Vec::new();
    out.extend_from_slice(if big_endian { b"MM" } else { b"II" });
    out.extend_from_slice(&u16_bytes(42));
    out.extend_from_slice(&u32_bytes(ifd_offset));
    out.extend_from_slice(&u16_bytes(entry_count));

    // Entries sorted by tag: ImageDescription (0x010E) before Orientation (0x0112)
    if let Some(bytes) = &desc {
        out.extend_from_slice(&u16_bytes(0x010E));
        out.extend_from_slice(&u16_bytes(2));
        out.extend_from_slice(&u32_bytes(bytes.len() as u32));
        if bytes.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..bytes.len()].copy_from_slice(bytes);
            out.extend_from_slice(&inline);
        } else {
            out.extend_from_slice(&u32_bytes(data_offset));
        }
    }
    if let Some(value) = orientation {
        out.extend_from_slice(&u16_bytes(0x0112));
        out.extend_from_slice(&u16_bytes(3));
        out.extend_from_slice(&u32_bytes(1));
        out.extend_from_slice(&u16_bytes(value));
        out.extend_from_slice(&[0, 0]);
    }
    out.extend_from_slice(&u32_bytes(0));

    if let Some(bytes) = desc.filter(|b| b.len() > 4) {
        out.extend_from_slice(&bytes);
    }
    out
}

/// A complete APP1 segment (marker, length, `Exif\0\0`, TIFF).
pub fn exif_app1_segment(orientation: Option<u16>, description: Option<&str>) -> Vec<u8> {
    let tiff = build_exif_tiff(orientation, description, false);
    let length = (2 + 6 + tiff.len()) as u16;
    let mut out = vec![0xFF, 0xE1];
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out
}

/// Insert an EXIF APP1 segment right after the SOI marker of a JPEG.
pub fn with_exif_segment(
    jpeg: &[u8],
    orientation: Option<u16>,
    description: Option<&str>,
) -> Vec<u8> {
    assert!(jpeg.starts_with(&[0xFF, 0xD8]), "not a JPEG");
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&exif_app1_segment(orientation, description));
    out.extend_from_slice(&jpeg[2..]);
    out
}
