//! Domain-level error types

use thiserror::Error;

/// A stored value that could not be interpreted (e.g. an unparseable date)
///
/// Engines recover from this locally by treating the datum as absent; it is never
/// propagated out of a pass and never flagged on its own.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed {kind} value: '{value}'")]
pub struct MalformedValue {
    /// What the value was expected to be (e.g. "date")
    pub kind: &'static str,
    /// The raw text that failed to parse
    pub value: String,
}

impl MalformedValue {
    /// Create a new malformed-value error
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A record that breaks one of the data model invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invariant violated: {0}")]
pub struct InvariantViolation(pub String);
