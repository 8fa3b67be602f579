//! Progress and failure reporting.
//!
//! The engine, walker and pool never print. Everything observable about a run
//! flows through a [`Reporter`], so callers decide whether events end up in
//! the log, in counters, or in a test's assertions.
//!
//! # Example
//!
//! ```
//! use rshred_core::{Pass, Reporter};
//! use std::path::Path;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! #[derive(Default)]
//! struct ZeroPassCounter(AtomicU64);
//!
//! impl Reporter for ZeroPassCounter {
//!     fn pass_completed(&self, _path: &Path, pass: Pass) {
//!         if pass == Pass::Zero {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//! }
//! ```

use crate::coordinator::TargetReport;
use crate::engine::{FileReport, Pass};
use crate::error::Error;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, trace};

/// Receives events from every stage of a run.
///
/// All hooks default to doing nothing. Implementations are shared between
/// target threads and workers, so they must be `Send + Sync`.
pub trait Reporter: Send + Sync {
    /// A target pipeline started, before its path is classified
    fn target_started(&self, target: &Path) {
        let _ = target;
    }

    /// The walker queued a file
    fn entry_discovered(&self, path: &Path) {
        let _ = path;
    }

    /// The walker skipped a non-directory entry it will not shred
    fn entry_skipped(&self, path: &Path, reason: &str) {
        let _ = (path, reason);
    }

    /// A file is about to be shredded; `worker` is `None` for single-file targets
    fn file_started(&self, worker: Option<usize>, path: &Path) {
        let _ = (worker, path);
    }

    /// One overwrite pass finished and was flushed
    fn pass_completed(&self, path: &Path, pass: Pass) {
        let _ = (path, pass);
    }

    /// A file went through every pass (and removal, if configured)
    fn file_finished(&self, report: &FileReport) {
        let _ = report;
    }

    /// Shredding a file inside a directory target failed
    fn file_failed(&self, path: &Path, error: &Error) {
        let _ = (path, error);
    }

    /// A target pipeline completed
    fn target_finished(&self, report: &TargetReport) {
        let _ = report;
    }

    /// A target pipeline failed
    fn target_failed(&self, target: &Path, error: &Error) {
        let _ = (target, error);
    }
}

/// A reporter that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// A reporter that logs every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn target_started(&self, target: &Path) {
        debug!(path = %target.display(), "Starting target");
    }

    fn entry_discovered(&self, path: &Path) {
        trace!("Reading path: {}", path.display());
    }

    fn entry_skipped(&self, path: &Path, reason: &str) {
        debug!("Skipping {}: {}", path.display(), reason);
    }

    fn file_started(&self, worker: Option<usize>, path: &Path) {
        match worker {
            Some(id) => debug!(worker = id, "Job {} - running on {}", id, path.display()),
            None => debug!("Shredding the file '{}'", path.display()),
        }
    }

    fn pass_completed(&self, path: &Path, pass: Pass) {
        trace!("Pass {} done on {}", pass, path.display());
    }

    fn file_finished(&self, report: &FileReport) {
        info!(
            size = report.size,
            passes = report.passes,
            removed = report.removed,
            "Shredded {}",
            report.path.display()
        );
    }

    fn file_failed(&self, path: &Path, error: &Error) {
        error!("Failed to shred {}: {}", path.display(), error);
    }

    fn target_finished(&self, report: &TargetReport) {
        info!(
            shredded = report.files_shredded,
            failed = report.files_failed,
            skipped = report.entries_skipped,
            "Finished {} in {:?}",
            report.path.display(),
            report.elapsed
        );
    }

    fn target_failed(&self, target: &Path, error: &Error) {
        error!("Target {} failed: {}", target.display(), error);
    }
}

/// Point-in-time copy of the counters kept by a [`StatsReporter`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReporterStats {
    /// Targets started
    pub targets_started: u64,
    /// Targets finished without a target-level error
    pub targets_finished: u64,
    /// Targets that failed
    pub targets_failed: u64,
    /// Files queued by walkers
    pub entries_discovered: u64,
    /// Entries skipped by walkers
    pub entries_skipped: u64,
    /// Files shredded completely
    pub files_shredded: u64,
    /// Files that failed inside directory targets
    pub files_failed: u64,
    /// Overwrite passes completed across all files
    pub passes: u64,
    /// Bytes written across all passes of completed files
    pub bytes_overwritten: u64,
}

/// A reporter that counts events
#[derive(Debug, Default)]
pub struct StatsReporter {
    targets_started: AtomicU64,
    targets_finished: AtomicU64,
    targets_failed: AtomicU64,
    entries_discovered: AtomicU64,
    entries_skipped: AtomicU64,
    files_shredded: AtomicU64,
    files_failed: AtomicU64,
    passes: AtomicU64,
    bytes_overwritten: AtomicU64,
}

impl StatsReporter {
    /// Creates a reporter with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every counter
    pub fn snapshot(&self) -> ReporterStats {
        ReporterStats {
            targets_started: self.targets_started.load(Ordering::Relaxed),
            targets_finished: self.targets_finished.load(Ordering::Relaxed),
            targets_failed: self.targets_failed.load(Ordering::Relaxed),
            entries_discovered: self.entries_discovered.load(Ordering::Relaxed),
            entries_skipped: self.entries_skipped.load(Ordering::Relaxed),
            files_shredded: self.files_shredded.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            passes: self.passes.load(Ordering::Relaxed),
            bytes_overwritten: self.bytes_overwritten.load(Ordering::Relaxed),
        }
    }
}

impl Reporter for StatsReporter {
    fn target_started(&self, _target: &Path) {
        self.targets_started.fetch_add(1, Ordering::Relaxed);
    }

    fn entry_discovered(&self, _path: &Path) {
        self.entries_discovered.fetch_add(1, Ordering::Relaxed);
    }

    fn entry_skipped(&self, _path: &Path, _reason: &str) {
        self.entries_skipped.fetch_add(1, Ordering::Relaxed);
    }

    fn pass_completed(&self, _path: &Path, _pass: Pass) {
        self.passes.fetch_add(1, Ordering::Relaxed);
    }

    fn file_finished(&self, report: &FileReport) {
        self.files_shredded.fetch_add(1, Ordering::Relaxed);
        self.bytes_overwritten
            .fetch_add(report.size.saturating_mul(report.passes), Ordering::Relaxed);
    }

    fn file_failed(&self, _path: &Path, _error: &Error) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    fn target_finished(&self, _report: &TargetReport) {
        self.targets_finished.fetch_add(1, Ordering::Relaxed);
    }

    fn target_failed(&self, _target: &Path, _error: &Error) {
        self.targets_failed.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IoOp;
    use pretty_assertions::assert_eq;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_null_reporter() {
        let reporter = NullReporter;
        reporter.target_started(Path::new("/tmp"));
        reporter.pass_completed(Path::new("/tmp/a"), Pass::Zero);
    }

    #[test]
    fn test_stats_reporter() {
        let reporter = StatsReporter::new();
        let path = Path::new("/tmp/a");

        reporter.target_started(path);
        reporter.entry_discovered(path);
        reporter.pass_completed(path, Pass::Random { index: 0 });
        reporter.pass_completed(path, Pass::Zero);
        reporter.file_finished(&FileReport {
            path: PathBuf::from(path),
            size: 10,
            passes: 2,
            removed: false,
        });
        reporter.file_failed(
            Path::new("/tmp/b"),
            &Error::io("/tmp/b", IoOp::Open, io::Error::from(io::ErrorKind::PermissionDenied)),
        );

        assert_eq!(
            reporter.snapshot(),
            ReporterStats {
                targets_started: 1,
                entries_discovered: 1,
                files_shredded: 1,
                files_failed: 1,
                passes: 2,
                bytes_overwritten: 20,
                ..ReporterStats::default()
            }
        );
    }
}
