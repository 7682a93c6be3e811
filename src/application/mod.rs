//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL creation, resolution and maintenance
//! - [`services::stats_service::StatsService`] - Access statistics

pub mod services;
