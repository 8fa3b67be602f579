//! Error types for the rshred-core library.
//!
//! Errors are split by blast radius: target-level errors abort a single
//! target pipeline, per-file errors abort a single file and the worker moves
//! on to the next one.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rshred operations
pub type Result<T> = std::result::Result<T, Error>;

/// The filesystem operation that failed while overwriting a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    /// Reading the file size
    Stat,
    /// Opening the file for read/write
    Open,
    /// Seeking back to offset 0
    Seek,
    /// Writing pass data
    Write,
    /// Flushing pass data to storage before close
    Sync,
    /// Removing the file after the last pass
    Remove,
}

impl IoOp {
    /// Returns a short lowercase name for the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            IoOp::Stat => "stat",
            IoOp::Open => "open",
            IoOp::Seek => "seek",
            IoOp::Write => "write",
            IoOp::Sync => "sync",
            IoOp::Remove => "remove",
        }
    }
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for all rshred operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A target path does not exist or its metadata cannot be read
    #[error("cannot access '{path}': {source}")]
    NotFoundOrInaccessible {
        /// The target path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading a directory failed while walking a target
    #[error("failed to traverse '{path}': {source}")]
    Traversal {
        /// The path where traversal failed
        path: PathBuf,
        /// Underlying walkdir error
        #[source]
        source: walkdir::Error,
    },

    /// An I/O operation failed while shredding a single file
    #[error("failed to {op} '{path}': {source}")]
    Io {
        /// The file being shredded
        path: PathBuf,
        /// The operation that failed
        op: IoOp,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Every worker went away before the walker finished queueing
    #[error("work queue closed before traversal finished")]
    QueueClosed,

    /// An OS thread could not be started
    #[error("failed to spawn thread '{name}': {source}")]
    ThreadSpawn {
        /// Name given to the thread
        name: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A worker or target thread panicked
    #[error("thread '{name}' panicked")]
    ThreadPanicked {
        /// Name of the thread
        name: String,
    },
}

impl Error {
    /// Creates a new not-found-or-inaccessible error
    pub fn not_found(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::NotFoundOrInaccessible {
            path: path.into(),
            source,
        }
    }

    /// Creates a new traversal error, preferring the path walkdir reports
    pub fn traversal(root: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        let path = source
            .path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| root.into());
        Self::Traversal { path, source }
    }

    /// Creates a new per-file I/O error
    pub fn io(path: impl Into<PathBuf>, op: IoOp, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            op,
            source,
        }
    }

    /// Creates a new thread spawn error
    pub fn thread_spawn(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::ThreadSpawn {
            name: name.into(),
            source,
        }
    }

    /// Creates a new thread panic error
    pub fn thread_panicked(name: impl Into<String>) -> Self {
        Self::ThreadPanicked { name: name.into() }
    }

    /// Returns true if this error only affects a single file
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let err = Error::io(
            "/tmp/secret.txt",
            IoOp::Write,
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        let msg = err.to_string();
        assert!(msg.contains("failed to write"));
        assert!(msg.contains("/tmp/secret.txt"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found("/missing", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.to_string().starts_with("cannot access '/missing'"));
    }

    #[test]
    fn test_is_per_file() {
        let io_err = Error::io("/a", IoOp::Open, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(io_err.is_per_file());
        assert!(!Error::QueueClosed.is_per_file());
        assert!(!Error::not_found("/a", io::Error::from(io::ErrorKind::NotFound)).is_per_file());
    }

    #[test]
    fn test_io_op_names() {
        assert_eq!(IoOp::Stat.to_string(), "stat");
        assert_eq!(IoOp::Sync.as_str(), "sync");
        assert_eq!(IoOp::Remove.as_str(), "remove");
    }
}
