//! Working directory scanning.
//!
//! Finds the topic directories of a working directory and the images inside
//! each of them:
//!
//! ```text
//! photos/                  # Working directory
//! ├── config.toml          # Settings (optional)
//! ├── fonts/LHANDW.TTF     # Caption font
//! ├── _Berlin/             # Topic directory (prefixed)
//! │   ├── IMG_0001.jpg
//! │   ├── IMG_0002.JPG
//! │   └── notes.txt        # Ignored: not a JPEG
//! ├── Berlin/              # Target of _Berlin, written by `convert`
//! └── archive/             # Ignored: no prefix
//! ```
//!
//! Topics and their images are returned sorted by name so runs are
//! reproducible. Nothing below a topic directory is visited.

use crate::config::Settings;
use crate::naming::{is_image_file, is_topic_dir_name, target_dir_name};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Working directory not found: {0}")]
    WorkDirNotFound(PathBuf),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A topic directory and the images it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDir {
    /// Directory name as found on disk, e.g. `_Berlin`.
    pub name: String,
    /// Full path of the topic directory.
    pub source: PathBuf,
    /// Full path of the target directory, e.g. `<work_dir>/Berlin`.
    pub target: PathBuf,
    /// Caption base text: the target directory name.
    pub caption: String,
    /// Image files, sorted by file name.
    pub images: Vec<PathBuf>,
}

impl TopicDir {
    /// Target path for one of this topic's images.
    pub fn target_for(&self, image: &Path) -> PathBuf {
        match image.file_name() {
            Some(name) => self.target.join(name),
            None => self.target.clone(),
        }
    }
}

/// Scan the working directory for topic directories.
pub fn scan(work_dir: &Path, settings: &Settings) -> Result<Vec<TopicDir>, ScanError> {
    if !work_dir.is_dir() {
        return Err(ScanError::WorkDirNotFound(work_dir.to_path_buf()));
    }

    let prefix = settings.topic_prefix.as_str();
    let mut dirs: Vec<(String, PathBuf)> = fs::read_dir(work_dir)
        .map_err(|source| ScanError::Io {
            path: work_dir.to_path_buf(),
            source,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter_map(|p| {
            let name = p.file_name()?.to_str()?.to_string();
            is_topic_dir_name(&name, prefix).then_some((name, p))
        })
        .collect();
    dirs.sort();

    let mut topics = Vec::new();
    for (name, source) in dirs {
        let target_name = target_dir_name(&name, prefix);
        // The target must be a fresh sibling: never the work dir itself and
        // never another topic's originals.
        if target_name.is_empty() || is_topic_dir_name(&target_name, prefix) {
            tracing::warn!(topic = %name, target = %target_name, "target would not be a plain directory, skipping");
            continue;
        }
        let images = match collect_images(&source) {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(dir = %source.display(), error = %e, "cannot read topic directory, skipping");
                continue;
            }
        };
        tracing::debug!(topic = %name, target = %target_name, images = images.len(), "found topic");
        topics.push(TopicDir {
            target: work_dir.join(&target_name),
            caption: target_name,
            name,
            source,
            images,
        });
    }

    Ok(topics)
}

/// List JPEG files directly inside a directory, sorted by file name.
fn collect_images(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut images: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        })?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_image_file(p))
        .collect();
    images.sort();
    Ok(images)
}
