//! LineageForge Domain Layer
//!
//! This crate contains the shared data model for the LineageForge knowledge graph.
//! Both engines (identity resolution and validation) depend on it, and the storage
//! layer implements the [`traits::ClaimsStore`] boundary defined here.
//!
//! ## Key Concepts
//!
//! - **Person**: An identity record; merges deactivate a record and point it at the survivor
//! - **Claim**: The only unit of fact - a provenance-tagged assertion about a person
//! - **Predicate**: Fixed vocabulary of claim relations (born-on, parent-of, ...)
//! - **Confidence tier**: Coarse bucket derived from a claim's [0, 1] confidence score
//! - **Merge event**: Immutable audit record of one identity-resolution decision
//! - **Flag**: Stored anomaly report produced by the validation engine
//!
//! ## Architecture
//!
//! - Pure data model and small derivations only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all store interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod dates;
pub mod error;
pub mod flag;
pub mod id;
pub mod merge;
pub mod person;
pub mod predicate;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use claim::Claim;
pub use error::{InvariantViolation, MalformedValue};
pub use flag::{EntityKind, Flag, FlagKind, Severity};
pub use id::{ClaimId, FlagId, MergeEventId, PersonId, PlaceId, RunId, SourceId};
pub use merge::{FeatureScores, MergeEvent, MergeMethod};
pub use person::{CanonicalFields, Person};
pub use predicate::{Predicate, PredicateCategory};
pub use tier::ConfidenceTier;

/// Current timestamp in seconds since Unix epoch
pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}
