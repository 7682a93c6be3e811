//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UrlStore`] - Durable mapping and archive storage
//! - [`StatsRepository`] - Access logging and statistics
//! - [`UrlRepository`] - Cache-aware resolution over a [`UrlStore`]
//!
//! # Testing
//!
//! See integration tests in `tests/` for usage examples.

pub mod stats_repository;
pub mod url_repository;
pub mod url_store;

pub use stats_repository::StatsRepository;
pub use url_repository::UrlRepository;
pub use url_store::UrlStore;

#[cfg(test)]
pub use stats_repository::MockStatsRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use url_store::MockUrlStore;
