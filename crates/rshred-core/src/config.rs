//! Shredding configuration.
//!
//! A [`ShredConfig`] is built once from user options and then shared
//! read-only (behind an `Arc`) by every target pipeline and worker.

/// Default number of random overwrite passes
pub const DEFAULT_ITERATIONS: u64 = 3;

/// Default number of workers per directory target
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Default number of slots in the job queue between walker and workers
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

/// What the directory walker does after a traversal error.
///
/// Both policies fail the target with the first traversal error and both
/// drain whatever was already queued. They differ in how much of the tree
/// gets shredded before that error is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraversalPolicy {
    /// Skip the unreadable subtree, finish the walk, then report the first
    /// error. This is the default, so files outside the bad subtree are
    /// still shredded.
    #[default]
    Continue,
    /// Stop walking at the first error, like a plain fail-fast recursive
    /// walk. Entries after the error are never queued.
    Abort,
}

/// Options shared by every worker of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShredConfig {
    /// Number of random-data overwrite passes
    pub iterations: u64,
    /// Append one zero-fill pass after the random passes
    pub zero_fill: bool,
    /// Remove the file once every pass has completed
    pub remove_after: bool,
    /// Workers per directory target (0 = [`DEFAULT_CONCURRENCY`])
    pub concurrency: usize,
    /// Bounded job queue size (0 is treated as 1)
    pub queue_capacity: usize,
    /// Behavior of the walker on traversal errors
    pub traversal_policy: TraversalPolicy,
    /// Leave symbolic links inside a directory target alone instead of
    /// shredding the file they point to
    pub skip_symlinks: bool,
}

impl Default for ShredConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            zero_fill: false,
            remove_after: false,
            concurrency: DEFAULT_CONCURRENCY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            traversal_policy: TraversalPolicy::default(),
            skip_symlinks: false,
        }
    }
}

impl ShredConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of random overwrite passes
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Enables or disables the final zero pass
    pub fn zero_fill(mut self, zero_fill: bool) -> Self {
        self.zero_fill = zero_fill;
        self
    }

    /// Enables or disables removal after overwriting
    pub fn remove_after(mut self, remove_after: bool) -> Self {
        self.remove_after = remove_after;
        self
    }

    /// Sets the number of workers per directory target
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the job queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the traversal error policy
    pub fn traversal_policy(mut self, policy: TraversalPolicy) -> Self {
        self.traversal_policy = policy;
        self
    }

    /// Enables or disables skipping symbolic links inside directory targets
    pub fn skip_symlinks(mut self, skip: bool) -> Self {
        self.skip_symlinks = skip;
        self
    }

    /// Number of workers actually spawned for a directory target
    pub fn worker_count(&self) -> usize {
        if self.concurrency == 0 {
            DEFAULT_CONCURRENCY
        } else {
            self.concurrency
        }
    }

    /// Job queue capacity actually used, never zero
    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }

    /// Total overwrite passes each file receives
    pub fn passes_per_file(&self) -> u64 {
        self.iterations + u64::from(self.zero_fill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShredConfig::default();
        assert_eq!(config.iterations, 3);
        assert!(!config.zero_fill);
        assert!(!config.remove_after);
        assert_eq!(config.worker_count(), 16);
        assert_eq!(config.effective_queue_capacity(), 50);
        assert_eq!(config.traversal_policy, TraversalPolicy::Continue);
        assert!(!config.skip_symlinks);
    }

    #[test]
    fn test_builder() {
        let config = ShredConfig::new()
            .iterations(1)
            .zero_fill(true)
            .remove_after(true)
            .concurrency(4)
            .queue_capacity(8)
            .traversal_policy(TraversalPolicy::Abort)
            .skip_symlinks(true);

        assert_eq!(config.iterations, 1);
        assert!(config.zero_fill);
        assert!(config.remove_after);
        assert_eq!(config.worker_count(), 4);
        assert_eq!(config.effective_queue_capacity(), 8);
        assert_eq!(config.traversal_policy, TraversalPolicy::Abort);
        assert!(config.skip_symlinks);
    }

    #[test]
    fn test_zero_concurrency_uses_default() {
        let config = ShredConfig::new().concurrency(0);
        assert_eq!(config.worker_count(), DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_zero_queue_capacity_is_clamped() {
        assert_eq!(ShredConfig::new().queue_capacity(0).effective_queue_capacity(), 1);
    }

    #[test]
    fn test_passes_per_file() {
        assert_eq!(ShredConfig::new().iterations(3).passes_per_file(), 3);
        assert_eq!(ShredConfig::new().iterations(3).zero_fill(true).passes_per_file(), 4);
        assert_eq!(ShredConfig::new().iterations(0).zero_fill(true).passes_per_file(), 1);
    }
}
