//! Command implementations.

pub mod candidates;
pub mod flags;
pub mod load;
pub mod merges;
pub mod resolve;
pub mod stats;
pub mod validate;

pub use self::candidates::execute_candidates;
pub use self::flags::{execute_flags, execute_resolve_flag};
pub use self::load::execute_load;
pub use self::merges::execute_merges;
pub use self::resolve::execute_resolve;
pub use self::stats::execute_stats;
pub use self::validate::execute_validate;

use crate::error::{CliError, Result};
use lineage_domain::PersonId;

/// Parse a person id argument.
pub(crate) fn parse_person(raw: &str) -> Result<PersonId> {
    PersonId::from_string(raw).map_err(CliError::InvalidInput)
}
