//! Error taxonomy shared by the stores, the cache and the resolver.

use thiserror::Error;

/// Failures raised by a [`crate::infrastructure::cache::CacheService`].
///
/// A missing key is not an error; `get` reports it as `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache operation error: {0}")]
    Operation(String),

    #[error("cache serialization error: {0}")]
    Serialization(String),
}

/// Outcome of a store, statistics or resolver operation that did not succeed.
///
/// `NotFound` and `Expired` are expected results on the redirect path and are
/// never logged as failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("short path not found")]
    NotFound,

    #[error("short path has expired")]
    Expired,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl RepositoryError {
    /// True for the outcomes callers treat as "this path does not resolve".
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::NotFound | Self::Expired)
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_covers_not_found_and_expired() {
        assert!(RepositoryError::NotFound.is_absent());
        assert!(RepositoryError::Expired.is_absent());
        assert!(!RepositoryError::Store("boom".into()).is_absent());
        assert!(!RepositoryError::Conflict("dup".into()).is_absent());
    }

    #[test]
    fn test_cache_error_converts_transparently() {
        let err: RepositoryError = CacheError::Connection("refused".into()).into();

        assert_eq!(err.to_string(), "cache connection error: refused");
        assert!(matches!(err, RepositoryError::Cache(CacheError::Connection(_))));
    }
}
