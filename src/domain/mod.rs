//! Domain layer containing business entities and logic.
//!
//! This module implements the core domain logic following Clean Architecture principles.
//! It defines entities, repository interfaces, capabilities and background work
//! independent of any particular store or cache.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`error`] - Repository and cache error taxonomy
//! - [`clock`] / [`code_generator`] - Injected capabilities
//! - [`background_task`] - Bounded queue of detached work
//! - [`background_worker`] - Consumer that executes queued work
//!
//! # Background Flow
//!
//! 1. A resolution succeeds (from cache or store)
//! 2. A [`background_task::BackgroundTask`] is pushed onto the bounded queue (non-blocking)
//! 3. [`background_worker::run_background_worker`] executes it with a timeout
//! 4. Failures are logged and counted, never retried

pub mod background_task;
pub mod background_worker;
pub mod clock;
pub mod code_generator;
pub mod entities;
pub mod error;
pub mod repositories;
