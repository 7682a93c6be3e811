//! Utility functions for identifier generation and URL processing.
//!
//! - [`code_generator`] - Random short path generation
//! - [`url_validator`] - Original URL validation

pub mod code_generator;
pub mod url_validator;
