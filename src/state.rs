//! Shared application state injected into every handler.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{StatsService, UrlService};
use crate::domain::background_task::BackgroundQueue;
use crate::domain::clock::Clock;
use crate::domain::code_generator::CodeGenerator;
use crate::domain::repositories::{StatsRepository, UrlRepository, UrlStore};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::resolver::ResolverRepository;

/// Application state shared across all HTTP handlers.
///
/// Cloning is cheap: every field is reference-counted or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService<dyn UrlRepository>>,
    pub stats_service: Arc<StatsService<dyn StatsRepository>>,
    /// Used directly only by the health check.
    pub store: Arc<dyn UrlStore>,
    pub cache: Arc<dyn CacheService>,
    pub background: BackgroundQueue,
    pub public_base_url: String,
}

/// Adapters and settings the state is assembled from.
pub struct StateParts {
    pub store: Arc<dyn UrlStore>,
    pub stats: Arc<dyn StatsRepository>,
    pub cache: Arc<dyn CacheService>,
    pub clock: Arc<dyn Clock>,
    pub generator: Arc<dyn CodeGenerator>,
    pub queue: BackgroundQueue,
    pub cache_ttl: Duration,
    pub public_base_url: String,
}

impl AppState {
    /// Wires the resolver and services on top of the given adapters.
    pub fn new(parts: StateParts) -> Self {
        let StateParts {
            store,
            stats,
            cache,
            clock,
            generator,
            queue,
            cache_ttl,
            public_base_url,
        } = parts;

        let repository: Arc<dyn UrlRepository> = Arc::new(ResolverRepository::new(
            store.clone(),
            cache.clone(),
            clock.clone(),
            queue.clone(),
            cache_ttl,
        ));

        let url_service = Arc::new(UrlService::new(
            repository,
            generator,
            clock.clone(),
            queue.clone(),
        ));
        let stats_service = Arc::new(StatsService::new(stats, clock));

        Self {
            url_service,
            stats_service,
            store,
            cache,
            background: queue,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute short URL for a path.
    pub fn short_url(&self, short_path: &str) -> String {
        format!("{}/{}", self.public_base_url, short_path)
    }
}
