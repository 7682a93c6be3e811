//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and caching.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis, Moka and no-op implementations)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`memory`] - In-process repository implementations
//! - [`resolver`] - Cache-aside orchestration over a store and a cache

pub mod cache;
pub mod memory;
pub mod persistence;
pub mod resolver;
