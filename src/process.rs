//! Batch conversion of topic directories.
//!
//! For every topic directory found by [`scan`](crate::scan::scan):
//!
//! 1. create the target directory if needed,
//! 2. for each image, compare modification times with the target
//!    ([`cache::check`](crate::cache::check)) and skip it if up to date,
//! 3. otherwise read its EXIF metadata and render it through the
//!    [`ImageBackend`].
//!
//! A file that cannot be converted is logged and skipped; it never stops the
//! run. Only an unusable working directory is fatal.
//!
//! ## Output Structure
//!
//! ```text
//! photos/
//! ├── _Berlin/
//! │   ├── IMG_0001.jpg     # 4000x3000, EXIF orientation 6
//! │   └── IMG_0002.jpg     # 4000x3000
//! └── Berlin/
//!     ├── IMG_0001.jpg     # 450x600, upright, captioned "Berlin"
//!     └── IMG_0002.jpg     # 800x600, captioned "Berlin"
//! ```
//!
//! Progress is reported through a callback so the CLI can print it while the
//! library stays free of stdout writes.

use crate::cache::{self, Freshness, ProcessStats};
use crate::config::Settings;
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, RustBackend, convert_image, oriented_dimensions,
};
use crate::scan::{self, ScanError, TopicDir};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),
}

/// Why a single file could not be converted.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("cannot compare timestamps: {0}")]
    Timestamp(#[source] std::io::Error),
    #[error("{0}")]
    Imaging(#[from] BackendError),
}

/// Run options that are not part of the persisted settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Convert every image regardless of timestamps.
    pub force: bool,
    /// Only report what would be converted.
    pub dry_run: bool,
}

/// Outcome for a single image.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Converted {
        /// Upright source size.
        source: Dimensions,
        output: Dimensions,
        caption: Option<String>,
    },
    UpToDate,
    /// Dry run: would be converted.
    Pending(Freshness),
    Failed(String),
}

/// Progress event emitted while processing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    TopicStarted {
        name: String,
        target: String,
        image_count: usize,
    },
    TopicSkipped {
        name: String,
        reason: String,
    },
    ImageDone {
        index: usize,
        file_name: String,
        status: FileStatus,
    },
}

/// Result of a processing run.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub topics: Vec<TopicDir>,
    pub stats: ProcessStats,
}

/// Process all topic directories with the default backend.
pub fn process(
    work_dir: &Path,
    settings: &Settings,
    options: ProcessOptions,
    on_event: impl FnMut(&ProcessEvent),
) -> Result<ProcessResult, ProcessError> {
    process_with_backend(&RustBackend::new(), work_dir, settings, options, on_event)
}

/// Process all topic directories with a custom backend (for testing).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    work_dir: &Path,
    settings: &Settings,
    options: ProcessOptions,
    mut on_event: impl FnMut(&ProcessEvent),
) -> Result<ProcessResult, ProcessError> {
    let topics = scan::scan(work_dir, settings)?;
    tracing::info!(work_dir = %work_dir.display(), topics = topics.len(), "scanned working directory");

    let mut stats = ProcessStats::default();
    for topic in &topics {
        let created = if options.dry_run {
            Ok(())
        } else {
            std::fs::create_dir_all(&topic.target)
        };
        if let Err(e) = created {
            tracing::warn!(target_dir = %topic.target.display(), error = %e, "cannot create target directory");
            on_event(&ProcessEvent::TopicSkipped {
                name: topic.name.clone(),
                reason: e.to_string(),
            });
            for _ in &topic.images {
                stats.failed();
            }
            continue;
        }

        on_event(&ProcessEvent::TopicStarted {
            name: topic.name.clone(),
            target: display_name(&topic.target),
            image_count: topic.images.len(),
        });

        for (i, source) in topic.images.iter().enumerate() {
            let status = process_file(backend, topic, source, work_dir, settings, options);
            match &status {
                FileStatus::Converted { .. } => stats.converted(),
                FileStatus::UpToDate => stats.up_to_date(),
                FileStatus::Pending(_) => {}
                FileStatus::Failed(_) => stats.failed(),
            }
            on_event(&ProcessEvent::ImageDone {
                index: i + 1,
                file_name: display_name(source),
                status,
            });
        }
    }

    tracing::info!(%stats, "processing finished");
    Ok(ProcessResult { topics, stats })
}

/// Convert one file, turning every failure into a logged [`FileStatus::Failed`].
fn process_file(
    backend: &impl ImageBackend,
    topic: &TopicDir,
    source: &Path,
    work_dir: &Path,
    settings: &Settings,
    options: ProcessOptions,
) -> FileStatus {
    let target = topic.target_for(source);
    match try_process_file(backend, topic, source, &target, work_dir, settings, options) {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(source = %source.display(), error = %e, "conversion failed, skipping");
            FileStatus::Failed(e.to_string())
        }
    }
}

fn try_process_file(
    backend: &impl ImageBackend,
    topic: &TopicDir,
    source: &Path,
    target: &Path,
    work_dir: &Path,
    settings: &Settings,
    options: ProcessOptions,
) -> Result<FileStatus, FileError> {
    let freshness = if options.force {
        Freshness::Stale
    } else {
        cache::check(source, target).map_err(FileError::Timestamp)?
    };

    if !freshness.needs_conversion() {
        tracing::debug!(source = %source.display(), "target up to date");
        return Ok(FileStatus::UpToDate);
    }
    if options.dry_run {
        return Ok(FileStatus::Pending(freshness));
    }

    tracing::info!(source = %source.display(), target = %target.display(), "converting");
    let stored = backend.identify(source)?;
    let (params, output_dims) =
        convert_image(backend, source, target, &topic.caption, settings, work_dir)?;
    let (width, height) = oriented_dimensions((stored.width, stored.height), params.orientation);

    Ok(FileStatus::Converted {
        source: Dimensions { width, height },
        output: output_dims,
        caption: params.caption.map(|c| c.text),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
