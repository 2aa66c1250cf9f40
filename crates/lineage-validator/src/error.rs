//! Validation error types

use thiserror::Error;

/// Errors that can occur during a validation pass
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A person expected to exist is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store error during validation
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

pub(crate) fn store_err<E: std::fmt::Display>(e: E) -> ValidationError {
    ValidationError::Store(e.to_string())
}
