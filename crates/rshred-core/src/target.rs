//! Target classification.

use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::path::Path;

/// How a target path is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Shredded directly, without a worker pool
    File,
    /// Walked and fed into a worker pool
    Directory,
}

impl TargetKind {
    /// Returns a short lowercase name for the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::File => "file",
            TargetKind::Directory => "directory",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Determines whether `path` is a single file or a directory root.
///
/// Symlinks given as targets are followed. Fails with
/// [`Error::NotFoundOrInaccessible`] when the metadata cannot be read.
pub fn classify(path: &Path) -> Result<TargetKind> {
    let metadata = fs::metadata(path).map_err(|e| Error::not_found(path, e))?;
    if metadata.is_dir() {
        Ok(TargetKind::Directory)
    } else {
        Ok(TargetKind::File)
    }
}
