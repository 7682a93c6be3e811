//! Identifier generation capability.

use crate::error::AppError;

/// Produces short paths for new mappings.
///
/// Implementations do not check for collisions; a duplicate surfaces later
/// as a conflict on insert.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if no identifier could be produced.
    fn generate(&self) -> Result<String, AppError>;
}
