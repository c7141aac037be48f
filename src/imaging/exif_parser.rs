//! Minimal EXIF reader for JPEG files.
//!
//! Extracts two fields from IFD0:
//! - Orientation (`0x0112`): how the stored pixels must be turned
//! - ImageDescription (`0x010E`): free-text description, used for captions
//!
//! EXIF lives in the JPEG APP1 marker, behind an `Exif\0\0` header, as a
//! small TIFF structure (byte order mark, magic 42, chain of IFDs).
//! Only IFD0 is needed; the Exif sub-IFD and thumbnails are ignored.

use std::path::Path;

const EXIF_HEADER: &[u8] = b"Exif\0\0";
const TAG_IMAGE_DESCRIPTION: u16 = 0x010E;
const TAG_ORIENTATION: u16 = 0x0112;
const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;

/// EXIF fields extracted from an image file, raw values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExifData {
    pub orientation: Option<u16>,
    pub description: Option<String>,
}

/// Read EXIF metadata from a JPEG file.
/// Returns default (empty) metadata on any read or parse failure.
pub fn read_exif(path: &Path) -> ExifData {
    match std::fs::read(path) {
        Ok(bytes) => read_exif_from_jpeg(&bytes),
        Err(_) => ExifData::default(),
    }
}

// ---------------------------------------------------------------------------
// JPEG: locate the APP1 Exif segment
// ---------------------------------------------------------------------------

/// Extract EXIF fields from in-memory JPEG bytes.
pub fn read_exif_from_jpeg(data: &[u8]) -> ExifData {
    match find_jpeg_app1_exif(data) {
        Some(tiff) => parse_tiff_ifd0(tiff),
        None => ExifData::default(),
    }
}

/// Find the TIFF payload inside a JPEG's APP1 `Exif` segment.
fn find_jpeg_app1_exif(data: &[u8]) -> Option<&[u8]> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // Fill bytes before a marker
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // Markers without a length field
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        // Start of scan or end of image: no metadata past this point
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }

        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if seg_len < 2 {
            return None;
        }
        let seg_start = pos + 4;
        let seg_end = (pos + 2 + seg_len).min(data.len());

        if marker == 0xE1 && seg_start <= seg_end {
            let segment = &data[seg_start..seg_end];
            if let Some(tiff) = segment.strip_prefix(EXIF_HEADER) {
                return Some(tiff);
            }
        }

        pos += 2 + seg_len;
    }
    None
}

// ---------------------------------------------------------------------------
// TIFF: walk IFD0
// ---------------------------------------------------------------------------

/// Byte-order aware reader over a TIFF block.
struct TiffReader<'a> {
    data: &'a [u8],
    big_endian: bool,
}

impl<'a> TiffReader<'a> {
    fn new(data: &'a [u8]) -> Option<Self> {
        if data.len() < 8 {
            return None;
        }
        let big_endian = match &data[0..2] {
            b"MM" => true,
            b"II" => false,
            _ => return None,
        };
        let reader = Self { data, big_endian };
        (reader.u16_at(2)? == 42).then_some(reader)
    }

    fn u16_at(&self, offset: usize) -> Option<u16> {
        let bytes: [u8; 2] = self.data.get(offset..offset + 2)?.try_into().ok()?;
        Some(if self.big_endian {
            u16::from_be_bytes(bytes)
        } else {
            u16::from_le_bytes(bytes)
        })
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        let bytes: [u8; 4] = self.data.get(offset..offset + 4)?.try_into().ok()?;
        Some(if self.big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        })
    }

    /// Read an ASCII value. Values of up to 4 bytes are stored inline in
    /// the entry, longer ones at an offset from the TIFF start.
    fn ascii(&self, entry_offset: usize, count: usize) -> Option<String> {
        let start = if count <= 4 {
            entry_offset + 8
        } else {
            self.u32_at(entry_offset + 8)? as usize
        };
        let raw = self.data.get(start..start.checked_add(count)?)?;
        let raw = raw.split(|&b| b == 0).next().unwrap_or(raw);
        let text = String::from_utf8_lossy(raw).trim().to_string();
        (!text.is_empty()).then_some(text)
    }
}

/// Parse orientation and description from IFD0 of a TIFF block.
fn parse_tiff_ifd0(data: &[u8]) -> ExifData {
    let mut result = ExifData::default();
    let Some(tiff) = TiffReader::new(data) else {
        return result;
    };
    let Some(ifd_offset) = tiff.u32_at(4).map(|o| o as usize) else {
        return result;
    };
    let Some(entry_count) = tiff.u16_at(ifd_offset) else {
        return result;
    };

    for i in 0..entry_count as usize {
        let entry_offset = ifd_offset + 2 + i * 12;
        let (Some(tag), Some(typ), Some(count)) = (
            tiff.u16_at(entry_offset),
            tiff.u16_at(entry_offset + 2),
            tiff.u32_at(entry_offset + 4),
        ) else {
            break;
        };

        match (tag, typ) {
            (TAG_ORIENTATION, TYPE_SHORT) if count >= 1 => {
                result.orientation = tiff.u16_at(entry_offset + 8);
            }
            (TAG_IMAGE_DESCRIPTION, TYPE_ASCII) => {
                result.description = tiff.ascii(entry_offset, count as usize);
            }
            _ => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{build_exif_tiff, exif_app1_segment, with_exif_segment};

    #[test]
    fn parse_empty_returns_default() {
        assert_eq!(parse_tiff_ifd0(&[]), ExifData::default());
    }

    #[test]
    fn parse_bad_magic_returns_default() {
        assert_eq!(
            parse_tiff_ifd0(b"II\x2b\x00\x08\x00\x00\x00"),
            ExifData::default()
        );
    }

    #[test]
    fn parse_little_endian_orientation() {
        let tiff = build_exif_tiff(Some(6), None, false);
        let result = parse_tiff_ifd0(&tiff);
        assert_eq!(result.orientation, Some(6));
        assert_eq!(result.description, None);
    }

    #[test]
    fn parse_big_endian_orientation_and_description() {
        let tiff = build_exif_tiff(Some(8), Some("Harbour at dawn"), true);
        let result = parse_tiff_ifd0(&tiff);
        assert_eq!(result.orientation, Some(8));
        assert_eq!(result.description, Some("Harbour at dawn".to_string()));
    }

    #[test]
    fn parse_short_inline_description() {
        let tiff = build_exif_tiff(None, Some("Sea"), false);
        assert_eq!(parse_tiff_ifd0(&tiff).description, Some("Sea".to_string()));
    }

    #[test]
    fn blank_description_is_none() {
        let tiff = build_exif_tiff(Some(1), Some("      "), false);
        let result = parse_tiff_ifd0(&tiff);
        assert_eq!(result.orientation, Some(1));
        assert_eq!(result.description, None);
    }

    #[test]
    fn truncated_ifd_keeps_what_was_read() {
        let mut tiff = build_exif_tiff(Some(3), Some("A long description here"), false);
        // Cut off the description payload
        tiff.truncate(tiff.len() - 10);
        let result = parse_tiff_ifd0(&tiff);
        assert_eq!(result.orientation, Some(3));
        assert_eq!(result.description, None);
    }

    #[test]
    fn jpeg_without_app1_returns_default() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xDA];
        assert_eq!(read_exif_from_jpeg(&jpeg), ExifData::default());
    }

    #[test]
    fn not_a_jpeg_returns_default() {
        assert_eq!(read_exif_from_jpeg(b"GIF89a....."), ExifData::default());
    }

    #[test]
    fn jpeg_with_exif_segment() {
        let jpeg = with_exif_segment(&[0xFF, 0xD8, 0xFF, 0xD9], Some(3), Some("Berlin"));
        let result = read_exif_from_jpeg(&jpeg);
        assert_eq!(result.orientation, Some(3));
        assert_eq!(result.description, Some("Berlin".to_string()));
    }

    #[test]
    fn app1_without_exif_header_is_skipped() {
        // XMP packets also live in APP1
        let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x07];
        jpeg.extend_from_slice(b"http:");
        jpeg.extend_from_slice(&exif_app1_segment(Some(6), None));
        jpeg.extend_from_slice(&[0xFF, 0xD9]);
        assert_eq!(read_exif_from_jpeg(&jpeg).orientation, Some(6));
    }

    #[test]
    fn read_exif_nonexistent_file() {
        assert_eq!(
            read_exif(Path::new("/nonexistent/image.jpg")),
            ExifData::default()
        );
    }
}
