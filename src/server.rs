//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache setup, background worker spawning,
//! and the Axum server lifecycle including graceful shutdown.

use crate::config::{CacheBackend, Config};
use crate::domain::background_task::BackgroundQueue;
use crate::domain::background_worker::{BackgroundWorker, run_background_worker};
use crate::domain::clock::SystemClock;
use crate::infrastructure::cache::{CacheService, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{PgStatsRepository, PgUrlStore};
use crate::routes::app_router;
use crate::state::{AppState, StateParts};
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;

/// Upper bound on waiting for queued background tasks after the server stops.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Cache backend (Redis, in-process or disabled)
/// - Background worker for cache warm-up and access recording
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, finishes
/// in-flight requests and then drains the background queue.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migrations fail
/// - Redis is selected explicitly but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let cache = build_cache(&config).await?;

    let pool = Arc::new(pool);
    let store = Arc::new(PgUrlStore::new(pool.clone()));
    let stats = Arc::new(PgStatsRepository::new(pool));

    let (queue, rx) = BackgroundQueue::new(config.background_queue_capacity);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = BackgroundWorker {
        cache: cache.clone(),
        stats: stats.clone(),
        generations: queue.generations().clone(),
        concurrency: config.background_worker_concurrency,
        task_timeout: config.background_task_timeout(),
    };
    let worker_handle = tokio::spawn(run_background_worker(rx, worker, shutdown_rx));

    let state = AppState::new(StateParts {
        store,
        stats,
        cache,
        clock: Arc::new(SystemClock),
        generator: Arc::new(RandomCodeGenerator::new(config.short_path_length)),
        queue,
        cache_ttl: config.cache_ttl(),
        public_base_url: config.public_base_url.clone(),
    });

    let app = app_router(state, config.request_timeout());

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped, draining background tasks");
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker_handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Background worker panicked"),
        Err(_) => tracing::warn!(
            timeout_secs = WORKER_DRAIN_TIMEOUT.as_secs(),
            "Background worker did not drain in time, abandoning pending tasks"
        ),
    }

    Ok(())
}

/// Creates the PostgreSQL pool from the `DB_*` settings.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Builds the configured cache backend.
///
/// When Redis was only picked because `REDIS_URL` is set and it cannot be
/// reached, caching is disabled with a warning rather than failing startup.
///
/// # Errors
///
/// Returns an error if `CACHE_BACKEND=redis` was set and Redis is unreachable.
pub async fn build_cache(config: &Config) -> Result<Arc<dyn CacheService>> {
    let ttl = config.cache_ttl();

    let cache: Arc<dyn CacheService> = match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(redis_url)) => match RedisCache::connect(redis_url, ttl).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) if config.cache_backend_explicit => {
                return Err(anyhow::anyhow!("Failed to connect to Redis: {}", e));
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        },
        (CacheBackend::Redis, None) => {
            anyhow::bail!("CACHE_BACKEND=redis requires REDIS_URL or REDIS_HOST")
        }
        (CacheBackend::Memory, _) => {
            tracing::info!(
                max_entries = config.cache_max_entries,
                "Cache enabled (in-process)"
            );
            Arc::new(MemoryCache::new(config.cache_max_entries, ttl))
        }
        (CacheBackend::None, _) => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    };

    Ok(cache)
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Terminate signal received, starting graceful shutdown");
}
