//! Random short path generation.

use crate::domain::code_generator::CodeGenerator;
use crate::error::AppError;
use base64::Engine as _;
use serde_json::json;

/// Default length of a generated short path.
pub const DEFAULT_CODE_LENGTH: usize = 12;

/// Generates short paths from OS entropy.
///
/// Random bytes are encoded as URL-safe base64 without padding and truncated
/// to `length`, so every character is drawn from `A-Za-z0-9_-`.
///
/// # Examples
///
/// ```ignore
/// let generator = RandomCodeGenerator::new(12);
/// let code = generator.generate()?;
/// assert_eq!(code.len(), 12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> Result<String, AppError> {
        // 3 bytes encode to 4 characters
        let mut buffer = vec![0u8; self.length.div_ceil(4) * 3];

        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::internal(
                "Failed to generate short path",
                json!({ "reason": e.to_string() }),
            )
        })?;

        let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
        code.truncate(self.length);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_default_length() {
        let code = RandomCodeGenerator::default().generate().unwrap();
        assert_eq!(code.len(), 12);
    }

    #[test]
    fn test_generate_code_respects_configured_length() {
        for length in [4, 5, 7, 12, 13, 64] {
            let code = RandomCodeGenerator::new(length).generate().unwrap();
            assert_eq!(code.len(), length, "length {}", length);
        }
    }

    #[test]
    fn test_generate_code_url_safe_characters() {
        let code = RandomCodeGenerator::new(64).generate().unwrap();
        assert!(
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert!(!code.contains('='));
    }

    #[test]
    fn test_generate_code_produces_unique_codes() {
        let generator = RandomCodeGenerator::default();
        let codes: HashSet<String> = (0..1000)
            .map(|_| generator.generate().unwrap())
            .collect();

        assert_eq!(codes.len(), 1000);
    }
}
