//! Directory traversal feeding the job queue.
//!
//! The walker visits every entry below a root in file-name order and hands
//! the path of each non-directory entry to a sink. Directories themselves
//! are never emitted and never followed. A symbolic link is a non-directory
//! entry, so it is emitted like a file and the engine shreds the file it
//! points to, unless the walker is told to skip links.

use crate::config::TraversalPolicy;
use crate::error::{Error, Result};
use crate::reporter::Reporter;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Counters for a completed walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    /// Paths handed to the sink
    pub emitted: u64,
    /// Non-directory entries that were not emitted
    pub skipped: u64,
}

/// Recursive walker over one directory target
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    root: PathBuf,
    policy: TraversalPolicy,
    skip_symlinks: bool,
}

impl DirectoryWalker {
    /// Creates a walker for `root` with the default traversal policy
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            policy: TraversalPolicy::default(),
            skip_symlinks: false,
        }
    }

    /// Sets the traversal error policy
    pub fn policy(mut self, policy: TraversalPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Skips symbolic links instead of emitting them
    pub fn skip_symlinks(mut self, skip: bool) -> Self {
        self.skip_symlinks = skip;
        self
    }

    /// Returns the root being walked
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the tree, passing every file path to `emit`.
    ///
    /// `emit` returns `false` when it can no longer accept work, which stops
    /// the walk with [`Error::QueueClosed`]. Traversal errors are handled
    /// according to the policy; with [`TraversalPolicy::Continue`] the first
    /// one is returned after the rest of the tree has been emitted.
    pub fn walk<F>(&self, reporter: &dyn Reporter, mut emit: F) -> Result<WalkSummary>
    where
        F: FnMut(PathBuf) -> bool,
    {
        let mut summary = WalkSummary::default();
        let mut first_error = None;

        debug!("Listing the directory: {}", self.root.display());

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let err = Error::traversal(&self.root, e);
                    match self.policy {
                        TraversalPolicy::Abort => return Err(err),
                        TraversalPolicy::Continue => {
                            warn!("{}", err);
                            first_error.get_or_insert(err);
                            continue;
                        }
                    }
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if file_type.is_symlink() && self.skip_symlinks {
                summary.skipped += 1;
                reporter.entry_skipped(entry.path(), "symbolic link");
                continue;
            }

            let path = entry.into_path();
            reporter.entry_discovered(&path);
            if !emit(path) {
                return Err(Error::QueueClosed);
            }
            summary.emitted += 1;
        }

        debug!(
            emitted = summary.emitted,
            skipped = summary.skipped,
            "Walk of {} complete",
            self.root.display()
        );

        match first_error {
            Some(err) => Err(err),
            None => Ok(summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{NullReporter, StatsReporter};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn build_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        fs::write(dir.path().join("top.txt"), b"1").unwrap();
        fs::write(dir.path().join("a/one.txt"), b"2").unwrap();
        fs::write(dir.path().join("a/b/two.txt"), b"3").unwrap();
        dir
    }

    fn relative(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_emits_only_files_in_name_order() {
        let dir = build_tree();
        let mut seen = Vec::new();

        let summary = DirectoryWalker::new(dir.path())
            .walk(&NullReporter, |p| {
                seen.push(p);
                true
            })
            .unwrap();

        assert_eq!(summary, WalkSummary { emitted: 3, skipped: 0 });
        assert_eq!(
            relative(dir.path(), &seen),
            vec!["a/b/two.txt", "a/one.txt", "top.txt"]
        );
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let summary = DirectoryWalker::new(dir.path())
            .walk(&NullReporter, |_| true)
            .unwrap();
        assert_eq!(summary.emitted, 0);
    }

    #[test]
    fn test_refused_item_stops_walk() {
        let dir = build_tree();
        let mut calls = 0;

        let err = DirectoryWalker::new(dir.path())
            .walk(&NullReporter, |_| {
                calls += 1;
                false
            })
            .unwrap_err();

        assert!(matches!(err, Error::QueueClosed));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_missing_root_is_traversal_error() {
        let dir = TempDir::new().unwrap();
        let err = DirectoryWalker::new(dir.path().join("gone"))
            .walk(&NullReporter, |_| true)
            .unwrap_err();
        assert!(matches!(err, Error::Traversal { .. }));
    }

    #[cfg(unix)]
    fn build_tree_with_link() -> (TempDir, TempDir) {
        let dir = build_tree();
        let outside = TempDir::new().unwrap();
        let victim = outside.path().join("victim.txt");
        fs::write(&victim, b"outside").unwrap();
        std::os::unix::fs::symlink(&victim, dir.path().join("link.txt")).unwrap();
        fs::create_dir(outside.path().join("elsewhere")).unwrap();
        fs::write(outside.path().join("elsewhere/deep.txt"), b"deep").unwrap();
        std::os::unix::fs::symlink(outside.path().join("elsewhere"), dir.path().join("a/dirlink"))
            .unwrap();
        (dir, outside)
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_emitted_by_default() {
        let (dir, _outside) = build_tree_with_link();

        let mut seen = Vec::new();
        let summary = DirectoryWalker::new(dir.path())
            .walk(&NullReporter, |p| {
                seen.push(p);
                true
            })
            .unwrap();

        // Links are emitted as entries, never descended into
        assert_eq!(summary, WalkSummary { emitted: 5, skipped: 0 });
        assert_eq!(
            relative(dir.path(), &seen),
            vec!["a/b/two.txt", "a/dirlink", "a/one.txt", "link.txt", "top.txt"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped_on_request() {
        let (dir, _outside) = build_tree_with_link();
        let stats = StatsReporter::new();

        let mut seen = Vec::new();
        let summary = DirectoryWalker::new(dir.path())
            .skip_symlinks(true)
            .walk(&stats, |p| {
                seen.push(p);
                true
            })
            .unwrap();

        assert_eq!(summary, WalkSummary { emitted: 3, skipped: 2 });
        assert_eq!(stats.snapshot().entries_skipped, 2);
        assert_eq!(
            relative(dir.path(), &seen),
            vec!["a/b/two.txt", "a/one.txt", "top.txt"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("b_locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), b"x").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("c.txt"), b"c").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read it anyway
        let privileged = fs::read_dir(&locked).is_ok();

        let mut continued = Vec::new();
        let continue_result = DirectoryWalker::new(dir.path()).walk(&NullReporter, |p| {
            continued.push(p);
            true
        });

        let mut aborted = Vec::new();
        let abort_result = DirectoryWalker::new(dir.path())
            .policy(TraversalPolicy::Abort)
            .walk(&NullReporter, |p| {
                aborted.push(p);
                true
            });

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if privileged {
            return;
        }

        assert!(matches!(continue_result, Err(Error::Traversal { .. })));
        assert_eq!(relative(dir.path(), &continued), vec!["a.txt", "c.txt"]);

        assert!(matches!(abort_result, Err(Error::Traversal { .. })));
        assert_eq!(relative(dir.path(), &aborted), vec!["a.txt"]);
    }
}
