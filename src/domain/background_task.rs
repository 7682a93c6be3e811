//! Detached work queued from the request path.
//!
//! Cache warming and access logging must not delay or fail the request that
//! triggered them. Requests push a [`BackgroundTask`] onto a bounded
//! [`BackgroundQueue`] and move on; a dedicated worker drains it
//! (see [`crate::domain::background_worker::run_background_worker`]).
//!
//! # Backpressure
//!
//! The queue never blocks a request. When it is full the task is dropped,
//! logged at `warn` and counted in `background_tasks_dropped_total`.
//!
//! # Stale warm-ups
//!
//! A warm-up carries a record read earlier and may run after that record was
//! updated or removed. [`CacheGenerations`] orders the two: writers mark the
//! path before invalidating it, readers snapshot the counter before reading
//! the store, and the worker drops any warm-up whose snapshot predates the
//! latest mark for its path.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use metrics::counter;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::entities::{AccessLogEntry, ShortUrl};

/// A unit of best-effort work with no caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundTask {
    /// Store a record read from the durable store in the cache.
    ///
    /// `generation` is the [`CacheGenerations::snapshot`] taken before the read.
    WarmCache {
        record: ShortUrl,
        ttl: Duration,
        generation: u64,
    },
    /// Append an access row for a successful resolution.
    RecordAccess(AccessLogEntry),
}

impl BackgroundTask {
    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WarmCache { .. } => "warm_cache",
            Self::RecordAccess(_) => "record_access",
        }
    }

    pub fn short_path(&self) -> &str {
        match self {
            Self::WarmCache { record, .. } => &record.short_path,
            Self::RecordAccess(entry) => &entry.short_path,
        }
    }
}

/// Per-path invalidation marks shared by the resolver and the worker.
///
/// A global counter is advanced on every [`invalidate`](Self::invalidate) and
/// the new value is recorded for the path. A warm-up taken at snapshot `s` is
/// fresh for a path as long as the path's mark is not greater than `s`.
#[derive(Debug, Clone, Default)]
pub struct CacheGenerations {
    counter: Arc<AtomicU64>,
    marks: Arc<DashMap<String, u64>>,
}

impl CacheGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation. Take it before reading the store.
    pub fn snapshot(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }

    /// Marks `short_path` as changed. Call after the store write and before
    /// the cache entry is removed.
    pub fn invalidate(&self, short_path: &str) -> u64 {
        let mut mark = self.marks.entry(short_path.to_string()).or_insert(0);
        let generation = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        *mark = generation;
        generation
    }

    /// Whether a record read at `snapshot` may still be cached.
    pub fn is_fresh(&self, short_path: &str, snapshot: u64) -> bool {
        self.marks
            .get(short_path)
            .is_none_or(|mark| *mark <= snapshot)
    }
}

/// Producer handle for the background queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct BackgroundQueue {
    tx: mpsc::Sender<BackgroundTask>,
    generations: CacheGenerations,
}

impl BackgroundQueue {
    /// Creates a queue holding at most `capacity` pending tasks.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Configuration rejects that before startup.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<BackgroundTask>) {
        let (tx, rx) = mpsc::channel(capacity);
        let generations = CacheGenerations::new();
        (Self { tx, generations }, rx)
    }

    /// Invalidation marks checked by the worker before warming the cache.
    pub fn generations(&self) -> &CacheGenerations {
        &self.generations
    }

    /// Enqueues a task without waiting. Returns false if it was dropped.
    pub fn submit(&self, task: BackgroundTask) -> bool {
        match self.tx.try_send(task) {
            Ok(()) => true,
            Err(TrySendError::Full(task)) => {
                warn!(
                    task = task.kind(),
                    short_path = %task.short_path(),
                    "Background queue full, dropping task"
                );
                counter!("background_tasks_dropped_total", "task" => task.kind(), "reason" => "full")
                    .increment(1);
                false
            }
            Err(TrySendError::Closed(task)) => {
                warn!(
                    task = task.kind(),
                    short_path = %task.short_path(),
                    "Background queue closed, dropping task"
                );
                counter!("background_tasks_dropped_total", "task" => task.kind(), "reason" => "closed")
                    .increment(1);
                false
            }
        }
    }

    /// Queues a cache write for a record read from the durable store after
    /// `generation` was taken.
    pub fn warm_cache(&self, record: ShortUrl, ttl: Duration, generation: u64) -> bool {
        self.submit(BackgroundTask::WarmCache {
            record,
            ttl,
            generation,
        })
    }

    /// Queues an access log row for a successful resolution.
    pub fn record_access(&self, short_path: &str, accessed_at: DateTime<Utc>) -> bool {
        self.submit(BackgroundTask::RecordAccess(AccessLogEntry::new(
            short_path,
            accessed_at,
        )))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Maximum number of pending tasks.
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Number of tasks currently waiting.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }
}
