//! LineageForge Validation Engine
//!
//! Detects logical anomalies in the claims graph and records them as flags.
//! Flags never block anything; they are reports for a reviewer.
//!
//! # Rules
//!
//! - **Lifespan**: death before birth (error), or a life longer than 120 years (warning)
//! - **Generational spacing**: a parent born less than 10 (error) or more than 60
//!   (warning) years before the child
//! - **Temporal consistency**: a marriage dated before birth or after death (error)
//! - **Conflicting claims**: one predicate asserted with several distinct values (warning)
//! - **Circular relationships**: a person who is their own ancestor (critical)
//!
//! Dates are parsed fuzzily; a date that cannot be parsed counts as missing.
//!
//! # Usage
//!
//! ```no_run
//! use lineage_validator::{ValidationConfig, Validator};
//! use lineage_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("lineage.db")?;
//! let summary = Validator::new(ValidationConfig::default())?.validate_all(&mut store)?;
//! println!("{}", summary.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [validator]
//! check_conflicting_claims = true
//! max_lifespan_years = 120.0
//! min_parent_gap_years = 10.0
//! max_parent_gap_years = 60.0
//! report_all_cycle_members = false
//! conflict_exempt_predicates = ["child_of"]
//! ```

#![warn(missing_docs)]

mod config;
pub mod cycle;
mod error;
mod rules;
mod summary;
mod validator;

#[cfg(test)]
mod testing;

pub use config::ValidationConfig;
pub use cycle::{CycleHit, ParentGraph};
pub use error::ValidationError;
pub use summary::ValidationSummary;
pub use validator::Validator;
