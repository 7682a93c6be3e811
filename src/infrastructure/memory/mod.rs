//! In-process repository implementations.
//!
//! Same contracts as the PostgreSQL repositories, without a database. Used by
//! the integration tests and for running the resolver locally.

mod stats_repository;
mod url_store;

pub use stats_repository::MemoryStatsRepository;
pub use url_store::MemoryUrlStore;
