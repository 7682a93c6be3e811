#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

use shortpath::domain::background_task::{BackgroundQueue, BackgroundTask};
use shortpath::domain::background_worker::BackgroundWorker;
use shortpath::domain::clock::ManualClock;
use shortpath::domain::code_generator::CodeGenerator;
use shortpath::error::AppError;
use shortpath::infrastructure::cache::{CacheService, MemoryCache};
use shortpath::infrastructure::memory::{MemoryStatsRepository, MemoryUrlStore};
use shortpath::state::{AppState, StateParts};

pub const BASE_URL: &str = "http://s.test";
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

/// Hands out `p1`, `p2`, ... so tests can name the paths they expect.
#[derive(Default)]
pub struct SequenceGenerator {
    next: AtomicUsize,
}

impl CodeGenerator for SequenceGenerator {
    fn generate(&self) -> Result<String, AppError> {
        Ok(format!("p{}", self.next.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Full service stack over in-memory adapters and a manual clock.
///
/// Background tasks are not run by a spawned worker: call [`TestApp::drain`]
/// to execute whatever is queued, deterministically.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryUrlStore>,
    pub stats: Arc<MemoryStatsRepository>,
    pub cache: Arc<dyn CacheService>,
    pub clock: Arc<ManualClock>,
    worker: BackgroundWorker,
    rx: mpsc::Receiver<BackgroundTask>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(MemoryCache::new(1_000, CACHE_TTL)))
    }

    pub fn with_cache(cache: Arc<dyn CacheService>) -> Self {
        Self::with_queue_capacity(cache, 100)
    }

    pub fn with_queue_capacity(cache: Arc<dyn CacheService>, capacity: usize) -> Self {
        let store = Arc::new(MemoryUrlStore::new());
        let stats = Arc::new(MemoryStatsRepository::new());
        let clock = Arc::new(ManualClock::new(start_time()));
        let (queue, rx) = BackgroundQueue::new(capacity);
        let generations = queue.generations().clone();

        let state = AppState::new(StateParts {
            store: store.clone(),
            stats: stats.clone(),
            cache: cache.clone(),
            clock: clock.clone(),
            generator: Arc::new(SequenceGenerator::default()),
            queue,
            cache_ttl: CACHE_TTL,
            public_base_url: BASE_URL.to_string(),
        });

        let worker = BackgroundWorker {
            cache: cache.clone(),
            stats: stats.clone(),
            generations,
            concurrency: 1,
            task_timeout: Duration::from_secs(1),
        };

        Self {
            state,
            store,
            stats,
            cache,
            clock,
            worker,
            rx,
        }
    }

    /// Runs every queued background task; returns how many ran.
    pub async fn drain(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            self.worker.execute(task).await;
            ran += 1;
        }
        ran
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.clock.advance(by);
    }
}
