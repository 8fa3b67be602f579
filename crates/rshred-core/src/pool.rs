//! Fixed-size worker pool fed by a bounded job queue.
//!
//! ```text
//! DirectoryWalker ──submit──▶ bounded queue (crossbeam) ──┬─▶ shred-worker-1 ─▶ shred_file
//!                                                         ├─▶ shred-worker-2 ─▶ shred_file
//!                                                         └─▶ shred-worker-N ─▶ shred_file
//! ```
//!
//! Closing the queue is the only stop signal. [`WorkerPool::finish`] closes
//! it and joins every worker, so once it returns every queued file has been
//! fully processed.

use crate::config::ShredConfig;
use crate::engine::shred_file;
use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// Counters for a drained pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolSummary {
    /// Number of workers that ran
    pub workers: usize,
    /// Files shredded completely
    pub shredded: u64,
    /// Files that failed
    pub failed: u64,
}

#[derive(Debug, Default)]
struct PoolCounters {
    shredded: AtomicU64,
    failed: AtomicU64,
}

/// A worker thread consuming the job queue
struct Worker {
    name: String,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    fn spawn(
        id: usize,
        receiver: Receiver<PathBuf>,
        config: Arc<ShredConfig>,
        reporter: Arc<dyn Reporter>,
        counters: Arc<PoolCounters>,
    ) -> Result<Self> {
        let name = format!("shred-worker-{}", id);
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || worker_loop(id, receiver, config, reporter, counters))
            .map_err(|e| Error::thread_spawn(&name, e))?;

        Ok(Self {
            name,
            handle: Some(handle),
        })
    }

    fn join(mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| Error::thread_panicked(&self.name)),
            None => Ok(()),
        }
    }
}

fn worker_loop(
    id: usize,
    receiver: Receiver<PathBuf>,
    config: Arc<ShredConfig>,
    reporter: Arc<dyn Reporter>,
    counters: Arc<PoolCounters>,
) {
    trace!(worker = id, "Worker starting");

    for path in receiver.iter() {
        reporter.file_started(Some(id), &path);
        match shred_file(&path, &config, &*reporter) {
            Ok(report) => {
                counters.shredded.fetch_add(1, Ordering::Relaxed);
                reporter.file_finished(&report);
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                reporter.file_failed(&path, &e);
            }
        }
    }

    trace!(worker = id, "Queue closed, worker exiting");
}

/// Pool of shredding workers for one directory target
pub struct WorkerPool {
    sender: Option<Sender<PathBuf>>,
    workers: Vec<Worker>,
    counters: Arc<PoolCounters>,
    capacity: usize,
}

impl WorkerPool {
    /// Starts `config.worker_count()` workers behind a queue of
    /// `config.effective_queue_capacity()` slots.
    ///
    /// If a thread cannot be started, the workers already running are shut
    /// down before the error is returned.
    pub fn spawn(config: Arc<ShredConfig>, reporter: Arc<dyn Reporter>) -> Result<Self> {
        let capacity = config.effective_queue_capacity();
        let worker_count = config.worker_count();
        let (sender, receiver) = bounded(capacity);

        let mut pool = Self {
            sender: Some(sender),
            workers: Vec::with_capacity(worker_count),
            counters: Arc::new(PoolCounters::default()),
            capacity,
        };

        for id in 1..=worker_count {
            let worker = Worker::spawn(
                id,
                receiver.clone(),
                Arc::clone(&config),
                Arc::clone(&reporter),
                Arc::clone(&pool.counters),
            )?;
            pool.workers.push(worker);
        }

        debug!(workers = worker_count, capacity, "Worker pool started");
        Ok(pool)
    }

    /// Queues one file, blocking while the queue is full
    pub fn submit(&self, path: PathBuf) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(Error::QueueClosed)?;
        sender.send(path).map_err(|_| Error::QueueClosed)
    }

    /// Number of workers in the pool
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Number of queue slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Closes the queue and waits until every worker has drained it
    pub fn finish(mut self) -> Result<PoolSummary> {
        let workers = self.workers.len();
        let joined = self.shutdown();

        let summary = PoolSummary {
            workers,
            shredded: self.counters.shredded.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
        };
        debug!(
            shredded = summary.shredded,
            failed = summary.failed,
            "Worker pool drained"
        );

        joined.map(|()| summary)
    }

    /// Drops the sender and joins all workers, keeping the first panic
    fn shutdown(&mut self) -> Result<()> {
        self.sender.take();

        let mut first_error = None;
        for worker in self.workers.drain(..) {
            if let Err(e) = worker.join() {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
