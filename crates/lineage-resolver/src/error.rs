//! Error types for identity resolution

use thiserror::Error;

/// Errors that can occur during identity resolution
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// A person expected to exist is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Merge preconditions not met
    #[error("Merge precondition failed: {0}")]
    Precondition(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

pub(crate) fn store_err<E: std::fmt::Display>(e: E) -> ResolutionError {
    ResolutionError::Store(e.to_string())
}
