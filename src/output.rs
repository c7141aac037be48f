//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every topic is shown by its positional index and directory name, followed
//! by `→` and the target directory. Files are listed underneath, indented,
//! with their status as secondary context.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! 001 _Berlin → Berlin (3 photos)
//!     001 IMG_0001.jpg: up to date
//!     002 IMG_0002.jpg: stale
//!     003 IMG_0003.jpg: new
//! 002 _Sea → Sea (0 photos)
//!
//! 2 to convert, 1 up to date
//! ```
//!
//! ## Convert
//!
//! ```text
//! _Berlin → Berlin (3 photos)
//!     001 IMG_0001.jpg: up to date
//!     002 IMG_0002.jpg: converted 4000x3000 → 800x600 "Berlin"
//!     003 IMG_0003.jpg: failed: Processing failed: ...
//!
//! 1 converted, 1 up to date, 1 failed (3 total)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::cache::Freshness;
use crate::process::{FileStatus, ProcessEvent};
use crate::scan::TopicDir;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Topic header without index: `_Berlin → Berlin (3 photos)`.
fn topic_line(name: &str, target: &str, count: usize) -> String {
    format!("{} \u{2192} {} ({} photos)", name, target, count)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Path relative to the working directory, for display.
fn relative(path: &Path, work_dir: &Path) -> String {
    path.strip_prefix(work_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Check output
// ============================================================================

/// Format the scanned topics with the freshness of every image.
///
/// `freshness` is asked for each image; `None` means it could not be
/// determined and the file is listed without a status.
pub fn format_scan_output(
    topics: &[TopicDir],
    work_dir: &Path,
    freshness: impl Fn(&TopicDir, &Path) -> Option<Freshness>,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending = 0;
    let mut fresh = 0;

    for (i, topic) in topics.iter().enumerate() {
        lines.push(format!(
            "{} {}",
            format_index(i + 1),
            topic_line(
                &topic.name,
                &relative(&topic.target, work_dir),
                topic.images.len()
            )
        ));
        for (j, image) in topic.images.iter().enumerate() {
            let name = format!("{} {}", format_index(j + 1), file_name(image));
            match freshness(topic, image) {
                Some(f) => {
                    if f.needs_conversion() {
                        pending += 1;
                    } else {
                        fresh += 1;
                    }
                    lines.push(format!("{}{}: {}", indent(1), name, f));
                }
                None => lines.push(format!("{}{}", indent(1), name)),
            }
        }
    }

    if topics.is_empty() {
        lines.push(format!(
            "No topic directories in {}",
            work_dir.display()
        ));
    } else {
        lines.push(String::new());
        lines.push(format!("{} to convert, {} up to date", pending, fresh));
    }
    lines
}

/// Print check output to stdout.
pub fn print_scan_output(
    topics: &[TopicDir],
    work_dir: &Path,
    freshness: impl Fn(&TopicDir, &Path) -> Option<Freshness>,
) {
    for line in format_scan_output(topics, work_dir, freshness) {
        println!("{}", line);
    }
}

// ============================================================================
// Convert output
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::TopicStarted {
            name,
            target,
            image_count,
        } => vec![topic_line(name, target, *image_count)],
        ProcessEvent::TopicSkipped { name, reason } => {
            vec![format!("{}: skipped: {}", name, reason)]
        }
        ProcessEvent::ImageDone {
            index,
            file_name,
            status,
        } => {
            let status = match status {
                FileStatus::Converted {
                    source,
                    output,
                    caption,
                } => {
                    let mut s = format!(
                        "converted {}x{} \u{2192} {}x{}",
                        source.width, source.height, output.width, output.height
                    );
                    if let Some(text) = caption {
                        s.push_str(&format!(" \"{}\"", text));
                    }
                    s
                }
                FileStatus::UpToDate => "up to date".to_string(),
                FileStatus::Pending(f) => format!("would convert ({})", f),
                FileStatus::Failed(reason) => format!("failed: {}", reason),
            };
            vec![format!(
                "{}{} {}: {}",
                indent(1),
                format_index(*index),
                file_name,
                status
            )]
        }
    }
}

/// Print a progress event to stdout.
pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use std::path::PathBuf;

    fn topic(work_dir: &Path, name: &str, target: &str, images: &[&str]) -> TopicDir {
        TopicDir {
            name: name.to_string(),
            source: work_dir.join(name),
            target: work_dir.join(target),
            caption: target.to_string(),
            images: images.iter().map(|i| work_dir.join(name).join(i)).collect(),
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn relative_strips_work_dir() {
        assert_eq!(relative(Path::new("/w/Berlin"), Path::new("/w")), "Berlin");
        assert_eq!(relative(Path::new("/x/Berlin"), Path::new("/w")), "/x/Berlin");
    }

    // =========================================================================
    // Check output tests
    // =========================================================================

    #[test]
    fn scan_output_lists_topics_and_freshness() {
        let w = PathBuf::from("/w");
        let topics = vec![
            topic(&w, "_Berlin", "Berlin", &["a.jpg", "b.jpg"]),
            topic(&w, "_Sea", "Sea", &[]),
        ];
        let lines = format_scan_output(&topics, &w, |_, image| {
            if image.ends_with("a.jpg") {
                Some(Freshness::UpToDate)
            } else {
                Some(Freshness::Missing)
            }
        });

        assert_eq!(
            lines,
            vec![
                "001 _Berlin \u{2192} Berlin (2 photos)",
                "    001 a.jpg: up to date",
                "    002 b.jpg: new",
                "002 _Sea \u{2192} Sea (0 photos)",
                "",
                "1 to convert, 1 up to date",
            ]
        );
    }

    #[test]
    fn scan_output_without_freshness() {
        let w = PathBuf::from("/w");
        let topics = vec![topic(&w, "_Berlin", "Berlin", &["a.jpg"])];
        let lines = format_scan_output(&topics, &w, |_, _| None);
        assert_eq!(lines[1], "    001 a.jpg");
        assert_eq!(lines[3], "0 to convert, 0 up to date");
    }

    #[test]
    fn scan_output_empty() {
        let lines = format_scan_output(&[], Path::new("/w"), |_, _| None);
        assert_eq!(lines, vec!["No topic directories in /w"]);
    }

    // =========================================================================
    // Convert output tests
    // =========================================================================

    #[test]
    fn format_topic_started() {
        let event = ProcessEvent::TopicStarted {
            name: "_Berlin".into(),
            target: "Berlin".into(),
            image_count: 3,
        };
        assert_eq!(
            format_process_event(&event),
            vec!["_Berlin \u{2192} Berlin (3 photos)"]
        );
    }

    #[test]
    fn format_converted_with_caption() {
        let event = ProcessEvent::ImageDone {
            index: 2,
            file_name: "IMG_0002.jpg".into(),
            status: FileStatus::Converted {
                source: Dimensions {
                    width: 4000,
                    height: 3000,
                },
                output: Dimensions {
                    width: 800,
                    height: 600,
                },
                caption: Some("Berlin".into()),
            },
        };
        assert_eq!(
            format_process_event(&event),
            vec!["    002 IMG_0002.jpg: converted 4000x3000 \u{2192} 800x600 \"Berlin\""]
        );
    }

    #[test]
    fn format_up_to_date_and_failed() {
        let up = ProcessEvent::ImageDone {
            index: 1,
            file_name: "a.jpg".into(),
            status: FileStatus::UpToDate,
        };
        assert_eq!(format_process_event(&up), vec!["    001 a.jpg: up to date"]);

        let failed = ProcessEvent::ImageDone {
            index: 3,
            file_name: "c.jpg".into(),
            status: FileStatus::Failed("bad data".into()),
        };
        assert_eq!(
            format_process_event(&failed),
            vec!["    003 c.jpg: failed: bad data"]
        );
    }

    #[test]
    fn format_pending() {
        let event = ProcessEvent::ImageDone {
            index: 1,
            file_name: "a.jpg".into(),
            status: FileStatus::Pending(Freshness::Stale),
        };
        assert_eq!(
            format_process_event(&event),
            vec!["    001 a.jpg: would convert (stale)"]
        );
    }

    #[test]
    fn format_topic_skipped() {
        let event = ProcessEvent::TopicSkipped {
            name: "_Sea".into(),
            reason: "File exists".into(),
        };
        assert_eq!(format_process_event(&event), vec!["_Sea: skipped: File exists"]);
    }
}
