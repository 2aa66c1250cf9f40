//! LineageForge Identity Resolution
//!
//! Batch detection and merging of duplicate person records.
//!
//! # Overview
//!
//! A pass runs four stages for every active person:
//! - **Candidate generation**: name tokens act as a blocking key; only persons sharing
//!   at least two case-folded tokens with the subject are considered
//! - **Scoring**: four independent features (names, dates, places, relationships)
//!   combined as `0.4*name + 0.3*dates + 0.2*places + 0.1*relationships`
//! - **Merging**: candidates at or above the threshold are absorbed into the subject
//!   in one transaction, with an immutable audit record
//! - **Orchestration**: persons absorbed earlier in the pass are skipped
//!
//! # Usage
//!
//! ```no_run
//! use lineage_resolver::{IdentityResolver, ResolverConfig};
//! use lineage_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("lineage.db")?;
//! let resolver = IdentityResolver::new(ResolverConfig::default())?;
//!
//! let summary = resolver.resolve_all(&mut store)?;
//! println!("{}", summary.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [resolver]
//! merge_threshold = 0.75
//! max_candidates = 100
//! min_shared_tokens = 2
//! performed_by = "system"
//! dry_run = false
//! ```

#![warn(missing_docs)]

mod candidates;
mod config;
mod error;
mod merge;
mod profile;
mod resolver;
pub mod scorer;
mod summary;

#[cfg(test)]
mod testing;

pub use candidates::{Candidate, CandidateGenerator};
pub use config::ResolverConfig;
pub use error::ResolutionError;
pub use merge::MergeExecutor;
pub use profile::{tokenize, PersonProfile};
pub use resolver::IdentityResolver;
pub use summary::ResolutionSummary;
