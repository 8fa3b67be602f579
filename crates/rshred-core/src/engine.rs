//! Overwrite engine: destroys the contents of a single file.
//!
//! ## Algorithm
//!
//! 1. Read the file size `S`
//! 2. `iterations` times: open read/write (no truncation), seek to 0, write
//!    `S` fresh random bytes, flush to storage, close
//! 3. Optionally one more pass with zeros
//! 4. Optionally remove the file
//!
//! The file length never changes. Passes run strictly in order and the first
//! failing operation aborts the file without touching the remaining passes.

use crate::config::ShredConfig;
use crate::error::{Error, IoOp, Result};
use crate::reporter::Reporter;
use rand::RngCore;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Size of the buffer each pass is written through
const CHUNK_SIZE: usize = 64 * 1024;

/// One overwrite pass over a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Random data, `index` counts from 0
    Random {
        /// Position of this pass among the random passes
        index: u64,
    },
    /// Final zero fill
    Zero,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Random { index } => write!(f, "random#{}", index + 1),
            Pass::Zero => f.write_str("zero"),
        }
    }
}

/// Outcome of shredding one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// The shredded file
    pub path: PathBuf,
    /// File size in bytes, unchanged by every pass
    pub size: u64,
    /// Number of passes written
    pub passes: u64,
    /// Whether the file was removed afterwards
    pub removed: bool,
}

/// Shreds a single file according to `config`.
///
/// Each completed pass is announced through `reporter`. Partial overwrites
/// are left in place when an operation fails.
pub fn shred_file(path: &Path, config: &ShredConfig, reporter: &dyn Reporter) -> Result<FileReport> {
    let size = fs::metadata(path)
        .map_err(|e| Error::io(path, IoOp::Stat, e))?
        .len();

    // Never allocate more than one chunk, and nothing for empty files
    let mut buffer = vec![0u8; size.min(CHUNK_SIZE as u64) as usize];
    let mut passes = 0;

    for index in 0..config.iterations {
        let pass = Pass::Random { index };
        overwrite(path, size, pass, &mut buffer)?;
        passes += 1;
        reporter.pass_completed(path, pass);
    }

    if config.zero_fill {
        overwrite(path, size, Pass::Zero, &mut buffer)?;
        passes += 1;
        reporter.pass_completed(path, Pass::Zero);
    }

    if config.remove_after {
        fs::remove_file(path).map_err(|e| Error::io(path, IoOp::Remove, e))?;
        trace!("Removed {}", path.display());
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        size,
        passes,
        removed: config.remove_after,
    })
}

/// Runs a single pass: open, seek, write `size` bytes, sync, close.
fn overwrite(path: &Path, size: u64, pass: Pass, buffer: &mut [u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| Error::io(path, IoOp::Open, e))?;

    file.seek(SeekFrom::Start(0))
        .map_err(|e| Error::io(path, IoOp::Seek, e))?;

    let mut rng = rand::thread_rng();
    if pass == Pass::Zero {
        buffer.fill(0);
    }

    let mut remaining = size;
    while remaining > 0 {
        let len = remaining.min(buffer.len() as u64) as usize;
        let chunk = &mut buffer[..len];
        if let Pass::Random { .. } = pass {
            rng.fill_bytes(chunk);
        }
        file.write_all(chunk)
            .map_err(|e| Error::io(path, IoOp::Write, e))?;
        remaining -= len as u64;
    }

    // Dropping a File swallows close errors; sync surfaces them instead
    file.sync_all().map_err(|e| Error::io(path, IoOp::Sync, e))?;

    trace!(size, "Pass {} written to {}", pass, path.display());
    Ok(())
}
