//! Original URL validation.
//!
//! URLs are checked but stored exactly as submitted, so the value returned by
//! a redirect is byte-for-byte what the caller created.

use url::Url;

/// Reasons an original URL is rejected before any store access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme '{0}': only http and https are allowed")]
    UnsupportedScheme(String),

    #[error("URL must include a host")]
    MissingHost,
}

/// Validates an original URL.
///
/// # Rules
///
/// 1. Not empty after trimming whitespace
/// 2. Parses as an absolute URL
/// 3. Scheme is `http` or `https`
/// 4. Has a non-empty host
///
/// # Errors
///
/// Returns the first [`UrlValidationError`] rule that fails.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com/path?q=1").is_ok());
/// assert!(validate_url("ftp://example.com").is_err());
/// assert!(validate_url("").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<(), UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(UrlValidationError::MissingHost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("https://example.com/a/b?c=d#frag").is_ok());
        assert!(validate_url("https://sub.example.com:8443/x").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        assert_eq!(validate_url(""), Err(UrlValidationError::Empty));
        assert_eq!(validate_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_relative_url() {
        assert!(matches!(
            validate_url("/just/a/path"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(matches!(
            validate_url("example.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for input in [
            "ftp://example.com",
            "javascript:alert(1)",
            "file:///etc/passwd",
            "mailto:someone@example.com",
        ] {
            assert!(
                matches!(
                    validate_url(input),
                    Err(UrlValidationError::UnsupportedScheme(_))
                ),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_error_message_names_scheme() {
        let err = validate_url("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("ftp"));
    }
}
