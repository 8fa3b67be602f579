//! Target pipelines and the multi-target coordinator.
//!
//! Every target runs on its own thread. A file target is shredded right
//! there; a directory target gets its own [`WorkerPool`] fed by a
//! [`DirectoryWalker`]. A target is only reported once its pool has fully
//! drained, and [`Shredder::shred_all`] only returns once every target has.

use crate::config::ShredConfig;
use crate::engine::shred_file;
use crate::error::{Error, Result};
use crate::pool::WorkerPool;
use crate::reporter::{Reporter, TracingReporter};
use crate::target::{classify, TargetKind};
use crate::walker::DirectoryWalker;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Outcome of a target that completed without a target-level error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    /// The target path as given
    pub path: PathBuf,
    /// Whether it was shredded as a file or walked as a directory
    pub kind: TargetKind,
    /// Files shredded completely
    pub files_shredded: u64,
    /// Files that failed (directory targets only)
    pub files_failed: u64,
    /// Entries the walker did not shred
    pub entries_skipped: u64,
    /// Wall time spent on the target
    pub elapsed: Duration,
}

/// Result of one target within a run.
///
/// The file counters are filled in even when `result` is an error, so work
/// done by a directory target before its walk failed is still accounted for.
#[derive(Debug)]
pub struct TargetOutcome {
    /// The target path as given
    pub path: PathBuf,
    /// The target's report, or the error that aborted it
    pub result: Result<TargetReport>,
    /// Files shredded completely
    pub files_shredded: u64,
    /// Files that failed inside a directory target
    pub files_failed: u64,
}

impl TargetOutcome {
    fn failed(path: &Path, error: Error) -> Self {
        Self {
            path: path.to_path_buf(),
            result: Err(error),
            files_shredded: 0,
            files_failed: 0,
        }
    }
}

/// Files processed by a target so far
#[derive(Debug, Default, Clone, Copy)]
struct FileCounts {
    shredded: u64,
    failed: u64,
}

/// Result of a multi-target run, in argument order
#[derive(Debug)]
pub struct RunReport {
    /// One outcome per target
    pub outcomes: Vec<TargetOutcome>,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl RunReport {
    /// Number of targets aborted by an error
    pub fn failed_targets(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// Files shredded across all targets, failed ones included
    pub fn files_shredded(&self) -> u64 {
        self.outcomes.iter().map(|o| o.files_shredded).sum()
    }

    /// Files that failed inside directory targets, failed ones included
    pub fn files_failed(&self) -> u64 {
        self.outcomes.iter().map(|o| o.files_failed).sum()
    }

    /// True when no target failed and no file failed
    pub fn is_success(&self) -> bool {
        self.failed_targets() == 0 && self.files_failed() == 0
    }
}

/// Runs shredding targets with a shared configuration and reporter
#[derive(Clone)]
pub struct Shredder {
    config: Arc<ShredConfig>,
    reporter: Arc<dyn Reporter>,
}

impl Shredder {
    /// Creates a shredder that logs through `tracing`
    pub fn new(config: ShredConfig) -> Self {
        Self::with_reporter(config, Arc::new(TracingReporter))
    }

    /// Creates a shredder with a custom reporter
    pub fn with_reporter(config: ShredConfig, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            config: Arc::new(config),
            reporter,
        }
    }

    /// Returns the configuration
    pub fn config(&self) -> &ShredConfig {
        &self.config
    }

    /// Shreds one target and waits until it is completely processed.
    ///
    /// Target-level errors are passed to the reporter before being returned.
    pub fn shred_path(&self, path: impl AsRef<Path>) -> Result<TargetReport> {
        self.shred_target(path.as_ref()).result
    }

    /// Like [`shred_path`](Self::shred_path), but keeps the file counters of
    /// a target that failed part way through.
    pub fn shred_target(&self, path: &Path) -> TargetOutcome {
        let start = Instant::now();
        let mut counts = FileCounts::default();
        self.reporter.target_started(path);

        let result = match self.run_target(path, start, &mut counts) {
            Ok(report) => {
                self.reporter.target_finished(&report);
                Ok(report)
            }
            Err(e) => {
                self.reporter.target_failed(path, &e);
                Err(e)
            }
        };

        TargetOutcome {
            path: path.to_path_buf(),
            result,
            files_shredded: counts.shredded,
            files_failed: counts.failed,
        }
    }

    /// Shreds every target concurrently, one thread per target.
    ///
    /// A failing target never stops the others.
    pub fn shred_all<I, P>(&self, paths: I) -> RunReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let start = Instant::now();
        let paths: Vec<PathBuf> = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();

        let outcomes: Vec<TargetOutcome> = thread::scope(|scope| {
            // Launch everything before joining anything
            let spawned: Vec<_> = paths
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    let name = format!("shred-target-{}", i + 1);
                    let handle = thread::Builder::new()
                        .name(name.clone())
                        .spawn_scoped(scope, move || self.shred_target(path));
                    (name, path, handle)
                })
                .collect();

            spawned
                .into_iter()
                .map(|(name, path, handle)| match handle {
                    Ok(handle) => handle.join().unwrap_or_else(|_| {
                        TargetOutcome::failed(path, Error::thread_panicked(name))
                    }),
                    Err(e) => {
                        let err = Error::thread_spawn(name, e);
                        self.reporter.target_failed(path, &err);
                        TargetOutcome::failed(path, err)
                    }
                })
                .collect()
        });

        RunReport {
            outcomes,
            elapsed: start.elapsed(),
        }
    }

    fn run_target(
        &self,
        path: &Path,
        start: Instant,
        counts: &mut FileCounts,
    ) -> Result<TargetReport> {
        let kind = classify(path)?;
        debug!(kind = %kind, "Classified {}", path.display());

        match kind {
            TargetKind::File => self.shred_single(path, start, counts),
            TargetKind::Directory => self.shred_directory(path, start, counts),
        }
    }

    fn shred_single(
        &self,
        path: &Path,
        start: Instant,
        counts: &mut FileCounts,
    ) -> Result<TargetReport> {
        self.reporter.file_started(None, path);
        let report = shred_file(path, &self.config, &*self.reporter)?;
        self.reporter.file_finished(&report);
        counts.shredded = 1;

        Ok(TargetReport {
            path: path.to_path_buf(),
            kind: TargetKind::File,
            files_shredded: 1,
            files_failed: 0,
            entries_skipped: 0,
            elapsed: start.elapsed(),
        })
    }

    fn shred_directory(
        &self,
        root: &Path,
        start: Instant,
        counts: &mut FileCounts,
    ) -> Result<TargetReport> {
        let pool = WorkerPool::spawn(Arc::clone(&self.config), Arc::clone(&self.reporter))?;
        let walker = DirectoryWalker::new(root)
            .policy(self.config.traversal_policy)
            .skip_symlinks(self.config.skip_symlinks);

        let walked = walker.walk(&*self.reporter, |path| pool.submit(path).is_ok());
        // Queued work always drains, whatever the walk returned
        let drained = pool.finish();
        if let Ok(summary) = &drained {
            counts.shredded = summary.shredded;
            counts.failed = summary.failed;
        }

        let walk = walked?;
        let summary = drained?;

        Ok(TargetReport {
            path: root.to_path_buf(),
            kind: TargetKind::Directory,
            files_shredded: summary.shredded,
            files_failed: summary.failed,
            entries_skipped: walk.skipped,
            elapsed: start.elapsed(),
        })
    }
}
