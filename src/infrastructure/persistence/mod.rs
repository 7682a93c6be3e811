//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` row types.
//!
//! # Repositories
//!
//! - [`PgUrlStore`] - Mapping storage, transactional archive on delete
//! - [`PgStatsRepository`] - Access logging and windowed counts

pub mod pg_stats_repository;
pub mod pg_url_store;

pub use pg_stats_repository::PgStatsRepository;
pub use pg_url_store::PgUrlStore;

use crate::domain::error::RepositoryError;
use tracing::error;

/// Collapses a SQLx error into the repository taxonomy.
///
/// Unique violations become [`RepositoryError::Conflict`]; everything else is
/// a [`RepositoryError::Store`] failure.
pub(crate) fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return RepositoryError::Conflict(
                db.constraint().unwrap_or("unique constraint").to_string(),
            );
        }
    }

    error!(error = %e, "Database error");
    RepositoryError::Store(e.to_string())
}
