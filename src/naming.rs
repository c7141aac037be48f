//! Naming convention for topic and target directories.
//!
//! Source photos live in *topic directories* whose name starts with a marker
//! prefix (`_` by default). Each topic directory has a sibling *target
//! directory* that receives the converted images:
//!
//! ```text
//! photos/
//! ├── _Berlin/          # topic: originals
//! │   └── IMG_0001.jpg
//! └── Berlin/           # target: scaled + captioned copies
//!     └── IMG_0001.jpg
//! ```
//!
//! The mapping between the two names is its own inverse: stripping the prefix
//! from a topic name gives the target name, and adding it back to the target
//! name gives the topic name again.

use std::path::Path;

/// File extensions picked up from topic directories (case-insensitive).
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Whether a directory name marks a topic directory.
pub fn is_topic_dir_name(name: &str, prefix: &str) -> bool {
    !prefix.is_empty() && name.starts_with(prefix)
}

/// Derive the target directory name from a topic directory name.
///
/// - `"_Berlin"` → `"Berlin"` (prefix stripped)
/// - `"Berlin"` → `"_Berlin"` (prefix added)
///
/// Applying it twice returns the input unchanged.
pub fn target_dir_name(name: &str, prefix: &str) -> String {
    match name.strip_prefix(prefix) {
        Some(rest) if !prefix.is_empty() => rest.to_string(),
        _ => format!("{prefix}{name}"),
    }
}

/// Whether a path looks like a JPEG we should convert.
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
