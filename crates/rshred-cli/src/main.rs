//! rshred - Overwrite files and directory trees in place
//!
//! Each file is overwritten several times with random data, optionally
//! zero-filled and removed. Directories are shredded recursively by a pool of
//! workers; every path given on the command line is processed concurrently.

use anyhow::Result;
use clap::Parser;
use rshred_core::config::{DEFAULT_CONCURRENCY, DEFAULT_ITERATIONS};
use rshred_core::{ShredConfig, Shredder, TraversalPolicy};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{warn, Level};
use tracing_subscriber::EnvFilter;

/// Securely overwrite files, optionally zero-fill and remove them
#[derive(Parser, Debug)]
#[command(name = "rshred")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files or directories to shred
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Overwrite N times instead of the default
    #[arg(short = 'n', long = "iteration", value_name = "N", default_value_t = DEFAULT_ITERATIONS)]
    iterations: u64,

    /// Remove each file after overwriting
    #[arg(long)]
    remove: bool,

    /// Add a final overwrite with zeros to hide shredding
    #[arg(short, long)]
    zero: bool,

    /// Number of workers per directory (0 = default)
    #[arg(short, long, value_name = "N", env = "RSHRED_JOBS", default_value_t = DEFAULT_CONCURRENCY)]
    jobs: usize,

    /// Stop walking a directory at the first unreadable entry
    #[arg(long)]
    stop_on_walk_error: bool,

    /// Leave symbolic links inside directories alone instead of shredding
    /// the files they point to
    #[arg(long)]
    skip_symlinks: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn shred_config(&self) -> ShredConfig {
        let policy = if self.stop_on_walk_error {
            TraversalPolicy::Abort
        } else {
            TraversalPolicy::Continue
        };

        ShredConfig::new()
            .iterations(self.iterations)
            .zero_fill(self.zero)
            .remove_after(self.remove)
            .concurrency(self.jobs)
            .traversal_policy(policy)
            .skip_symlinks(self.skip_symlinks)
    }
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let shredder = Shredder::new(cli.shred_config());

    for path in &cli.paths {
        println!("Start the shredding of {}", path.display());
    }

    let run = shredder.shred_all(&cli.paths);

    for outcome in &run.outcomes {
        match &outcome.result {
            Ok(report) => println!(
                "{}: {} shredded, {} failed ({})",
                outcome.path.display(),
                report.files_shredded,
                report.files_failed,
                report.kind
            ),
            Err(e) => println!(
                "{}: {} ({} shredded, {} failed before stopping)",
                outcome.path.display(),
                e,
                outcome.files_shredded,
                outcome.files_failed
            ),
        }
    }

    if !run.is_success() {
        warn!(
            failed_targets = run.failed_targets(),
            failed_files = run.files_failed(),
            "Some paths were not fully shredded"
        );
    }

    println!("Shredding finished in {:?}", start.elapsed());
    Ok(())
}
