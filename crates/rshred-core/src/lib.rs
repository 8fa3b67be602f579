//! # rshred-core
//!
//! A library for destroying file contents in place across files and
//! directory trees.
//!
//! Each file is overwritten a configurable number of times with
//! cryptographically secure random data, optionally followed by a zero pass
//! and removal. Directory targets are walked and shredded by a bounded pool of
//! worker threads; several targets run concurrently.
//!
//! ## Architecture
//!
//! - [`target`]: decides whether a path is a file or a directory root
//! - [`walker`]: recursive traversal feeding the job queue
//! - [`pool`]: fixed-size worker pool over a bounded queue
//! - [`engine`]: the per-file overwrite passes
//! - [`coordinator`]: one pipeline per target, joined into a [`RunReport`]
//! - [`reporter`]: progress and failure hooks
//! - [`config`] and [`error`]: shared options and error types
//!
//! ## Example
//!
//! ```no_run
//! use rshred_core::{ShredConfig, Shredder};
//!
//! let config = ShredConfig::new().iterations(3).zero_fill(true).remove_after(true);
//! let shredder = Shredder::new(config);
//!
//! let run = shredder.shred_all(["./old-keys", "./notes.txt"]);
//! println!("{} files shredded in {:?}", run.files_shredded(), run.elapsed);
//! ```
//!
//! When a file is shredded its content is NOT recoverable, so use with caution.
//! Copy-on-write filesystems and flash wear levelling may keep old blocks
//! around regardless.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod pool;
pub mod reporter;
pub mod target;
pub mod walker;

// Re-export primary types for convenience
pub use config::{ShredConfig, TraversalPolicy};
pub use coordinator::{RunReport, Shredder, TargetOutcome, TargetReport};
pub use engine::{shred_file, FileReport, Pass};
pub use error::{Error, IoOp, Result};
pub use pool::{PoolSummary, WorkerPool};
pub use reporter::{NullReporter, Reporter, ReporterStats, StatsReporter, TracingReporter};
pub use target::{classify, TargetKind};
pub use walker::{DirectoryWalker, WalkSummary};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
