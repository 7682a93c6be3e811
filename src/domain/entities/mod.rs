//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures with only the invariant checks that
//! belong to the data itself (for example, whether a record has expired).
//!
//! # Entity Types
//!
//! - [`ShortUrl`] - A live short path to original URL mapping
//! - [`UrlUpdate`] - Replacement values for the mutable fields of a mapping
//! - [`ArchivedUrl`] - A deleted mapping, frozen at the moment of deletion
//! - [`AccessLogEntry`] - A single successful resolution
//! - [`UrlStatistics`] - Windowed access counts, derived on demand

pub mod access_log;
pub mod archived_url;
pub mod short_url;

pub use access_log::{AccessLogEntry, UrlStatistics};
pub use archived_url::ArchivedUrl;
pub use short_url::{ShortUrl, UrlUpdate};
