//! Incremental conversion: decide whether a target file needs rebuilding.
//!
//! Decoding, resampling and re-encoding a full-resolution photo is the
//! expensive part of a run, and a typical photo frame library changes by a
//! handful of files between runs. Each source image is therefore compared
//! with its target by modification time:
//!
//! | Target | Result |
//! |---|---|
//! | does not exist | [`Freshness::Missing`] → convert |
//! | older than source | [`Freshness::Stale`] → convert |
//! | same age or newer | [`Freshness::UpToDate`] → skip |
//!
//! Equal timestamps count as up to date, so a target written in the same
//! filesystem tick as its source is not rebuilt on every run.
//!
//! Pass `--force` to `convert` to ignore the check and rebuild everything.

use std::fmt;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Outcome of comparing a source image with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Missing,
    Stale,
    UpToDate,
}

impl Freshness {
    pub fn needs_conversion(self) -> bool {
        !matches!(self, Freshness::UpToDate)
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Freshness::Missing => "new",
            Freshness::Stale => "stale",
            Freshness::UpToDate => "up to date",
        };
        f.write_str(s)
    }
}

/// Compare modification times.
pub fn freshness(source_mtime: SystemTime, target_mtime: Option<SystemTime>) -> Freshness {
    match target_mtime {
        None => Freshness::Missing,
        Some(target) if target >= source_mtime => Freshness::UpToDate,
        Some(_) => Freshness::Stale,
    }
}

/// Read both modification times from disk and compare them.
///
/// The source must exist; a missing target is [`Freshness::Missing`].
pub fn check(source: &Path, target: &Path) -> io::Result<Freshness> {
    let source_mtime = std::fs::metadata(source)?.modified()?;
    let target_mtime = match std::fs::metadata(target) {
        Ok(meta) => Some(meta.modified()?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };
    Ok(freshness(source_mtime, target_mtime))
}

/// Summary of a conversion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStats {
    pub converted: u32,
    pub up_to_date: u32,
    pub failed: u32,
}

impl ProcessStats {
    pub fn converted(&mut self) {
        self.converted += 1;
    }

    pub fn up_to_date(&mut self) {
        self.up_to_date += 1;
    }

    pub fn failed(&mut self) {
        self.failed += 1;
    }

    pub fn total(&self) -> u32 {
        self.converted + self.up_to_date + self.failed
    }
}

impl fmt::Display for ProcessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} up to date",
            self.converted, self.up_to_date
        )?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        write!(f, " ({} total)", self.total())
    }
}
