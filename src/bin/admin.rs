//! CLI administration tool for shortpath.
//!
//! Manages short URLs and inspects the database without going through the
//! HTTP API. Commands run the same services as the server, so validation,
//! archival and cache invalidation behave identically.
//!
//! # Usage
//!
//! ```bash
//! # Create a short URL that expires in one hour
//! cargo run --bin admin -- url create https://example.com/page --expires-in-minutes 60
//!
//! # Show, update and delete a mapping
//! cargo run --bin admin -- url show Zx81_qLmA0bc
//! cargo run --bin admin -- url update Zx81_qLmA0bc https://example.com/other
//! cargo run --bin admin -- url delete Zx81_qLmA0bc -y
//!
//! # Access statistics and archived versions
//! cargo run --bin admin -- url stats Zx81_qLmA0bc
//! cargo run --bin admin -- url archive Zx81_qLmA0bc
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see [`shortpath::config`]). When Redis is configured
//! it is used so that updates and deletes invalidate the server's cache.

use shortpath::config::{Config, load_from_env};
use shortpath::domain::background_task::BackgroundQueue;
use shortpath::domain::background_worker::{BackgroundWorker, run_background_worker};
use shortpath::domain::clock::SystemClock;
use shortpath::domain::repositories::UrlStore;
use shortpath::infrastructure::cache::{CacheService, NullCache, RedisCache};
use shortpath::infrastructure::persistence::{PgStatsRepository, PgUrlStore};
use shortpath::server::connect_pool;
use shortpath::state::{AppState, StateParts};
use shortpath::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Queue size for the CLI; it only ever holds a handful of tasks.
const CLI_QUEUE_CAPACITY: usize = 100;

/// CLI tool for managing shortpath.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short URLs
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Short URL subcommands.
#[derive(Subcommand)]
enum UrlAction {
    /// Create a short URL (or show the existing one for the same target)
    Create {
        /// Target URL
        url: String,

        /// Expire the mapping this many minutes from now
        #[arg(long)]
        expires_in_minutes: Option<i64>,
    },

    /// Show the record behind a short path
    Show { short_path: String },

    /// Replace the target (and expiry) of a short path
    Update {
        short_path: String,
        url: String,

        /// New expiry in minutes from now; omitted clears the expiry
        #[arg(long)]
        expires_in_minutes: Option<i64>,
    },

    /// Archive and delete a short path
    Delete {
        short_path: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show access statistics
    Stats { short_path: String },

    /// List archived versions of a short path
    Archive { short_path: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

/// Services plus the worker that runs their background tasks.
struct Runtime {
    state: AppState,
    shutdown: watch::Sender<bool>,
    worker: JoinHandle<()>,
}

impl Runtime {
    async fn start(config: &Config, pool: PgPool) -> Result<Self> {
        let cache: Arc<dyn CacheService> = match &config.redis_url {
            Some(redis_url) => Arc::new(
                RedisCache::connect(redis_url, config.cache_ttl())
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to Redis: {}", e))?,
            ),
            None => Arc::new(NullCache::new()),
        };

        let pool = Arc::new(pool);
        let store = Arc::new(PgUrlStore::new(pool.clone()));
        let stats = Arc::new(PgStatsRepository::new(pool));

        let (queue, rx) = BackgroundQueue::new(CLI_QUEUE_CAPACITY);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let worker = tokio::spawn(run_background_worker(
            rx,
            BackgroundWorker {
                cache: cache.clone(),
                stats: stats.clone(),
                generations: queue.generations().clone(),
                concurrency: 1,
                task_timeout: config.background_task_timeout(),
            },
            shutdown_rx,
        ));

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

        Ok(Self {
            state,
            shutdown,
            worker,
        })
    }

    /// Lets queued tasks finish before the process exits.
    async fn finish(self) {
        let _ = self.shutdown.send(true);
        let _ = tokio::time::timeout(Duration::from_secs(5), self.worker).await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_from_env()?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Url { action } => {
            let runtime = Runtime::start(&config, pool).await?;
            let result = handle_url_action(action, &runtime.state).await;
            runtime.finish().await;
            result?;
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches short URL commands.
async fn handle_url_action(action: UrlAction, state: &AppState) -> Result<()> {
    match action {
        UrlAction::Create {
            url,
            expires_in_minutes,
        } => {
            let expiry = expiry_from_minutes(Utc::now(), expires_in_minutes)?;
            let record = state
                .url_service
                .create_short_url(&url, expiry)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create short URL: {}", e))?;

            println!("{}", "✅ Short URL ready".green().bold());
            println!();
            println!("  Short path: {}", record.short_path.bright_yellow().bold());
            println!("  Short URL:  {}", state.short_url(&record.short_path).cyan());
            println!("  Target:     {}", record.original_url);
            println!("  Expires:    {}", format_expiry(record.expiry));
            println!();
        }
        UrlAction::Show { short_path } => {
            let record = state
                .url_service
                .get_url_details(&short_path)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "🔗 Short URL".bright_blue().bold());
            println!();
            println!("  Short path:  {}", record.short_path.bright_yellow());
            println!("  Target:      {}", record.original_url.cyan());
            println!("  Expires:     {}", format_expiry(record.expiry));
            println!(
                "  Created:     {} by {}",
                record.created_at.format("%Y-%m-%d %H:%M"),
                record.created_by
            );
            if let (Some(at), Some(by)) = (record.modified_at, &record.modified_by) {
                println!("  Modified:    {} by {}", at.format("%Y-%m-%d %H:%M"), by);
            }
            println!();
        }
        UrlAction::Update {
            short_path,
            url,
            expires_in_minutes,
        } => {
            let expiry = expiry_from_minutes(Utc::now(), expires_in_minutes)?;
            state
                .url_service
                .update_short_url(&short_path, &url, expiry)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to update short URL: {}", e))?;

            println!("{}", "✅ Short URL updated".green().bold());
        }
        UrlAction::Delete { short_path, yes } => {
            delete_url(state, &short_path, yes).await?;
        }
        UrlAction::Stats { short_path } => {
            let stats = state
                .stats_service
                .get_statistics(&short_path)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            println!("{}", "📊 Statistics".bright_blue().bold());
            println!();
            println!("  Short path:    {}", stats.short_path.bright_yellow());
            println!(
                "  Last 24 hours: {}",
                stats.last_24_hours.to_string().bright_green().bold()
            );
            println!(
                "  Past week:     {}",
                stats.past_week.to_string().bright_green().bold()
            );
            println!(
                "  All time:      {}",
                stats.all_time.to_string().bright_green().bold()
            );
            println!();
        }
        UrlAction::Archive { short_path } => {
            list_archive(state.store.as_ref(), &short_path).await?;
        }
    }

    Ok(())
}

/// Deletes a short path after confirmation (default: No).
async fn delete_url(state: &AppState, short_path: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Short URL".bright_blue().bold());
    println!();
    println!("  Short path: {}", short_path.bright_yellow());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Archive and delete this short URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let archived = state
        .url_service
        .delete_url(short_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete short URL: {}", e))?;

    println!(
        "{} (archived at {})",
        "✅ Short URL deleted".green().bold(),
        archived.deleted_at.format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}

/// Lists archived versions, oldest first.
///
/// # Output Format
///
/// ```text
/// 🗄  Archive for abc123
///
///   Deleted              By         Target
///   ──────────────────────────────────────────────────────────────
///   2025-01-15 10:30     system     https://example.com/old
/// ```
async fn list_archive(store: &dyn UrlStore, short_path: &str) -> Result<()> {
    println!(
        "{} {}",
        "🗄  Archive for".bright_blue().bold(),
        short_path.bright_yellow()
    );
    println!();

    let archived = store
        .find_archived(short_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read archive: {}", e))?;

    if archived.is_empty() {
        println!("{}", "  No archived versions".yellow());
        return Ok(());
    }

    println!(
        "  {:<20} {:<10} {}",
        "Deleted".bright_white().bold(),
        "By".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for entry in &archived {
        println!(
            "  {:<20} {:<10} {}",
            entry
                .deleted_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            entry.deleted_by.cyan(),
            entry.original_url
        );
    }

    println!();
    println!(
        "  Total: {}",
        archived.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1")
                .fetch_one(pool)
                .await
                .context("Database did not respond")?;

            let urls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
                .fetch_one(pool)
                .await
                .context("Failed to count urls; have migrations run?")?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  Live short URLs: {}", urls.to_string().bright_green());
        }
    }

    Ok(())
}

fn expiry_from_minutes(
    now: DateTime<Utc>,
    minutes: Option<i64>,
) -> Result<Option<DateTime<Utc>>> {
    minutes
        .map(|m| {
            chrono::Duration::try_minutes(m)
                .and_then(|offset| now.checked_add_signed(offset))
                .with_context(|| format!("Expiry of {} minutes is out of range", m))
        })
        .transpose()
}

fn format_expiry(expiry: Option<DateTime<Utc>>) -> ColoredString {
    match expiry {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string().normal(),
        None => "never".bright_black(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_expiry_from_minutes() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        assert_eq!(expiry_from_minutes(now, None).unwrap(), None);
        assert_eq!(
            expiry_from_minutes(now, Some(90)).unwrap(),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 13, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_expiry_from_minutes_rejects_overflow() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

        for minutes in [i64::MAX, i64::MIN, i64::MAX / 60, 1_000_000_000_000] {
            let err = expiry_from_minutes(now, Some(minutes)).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{minutes}");
        }
    }
}
