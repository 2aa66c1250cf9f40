//! Candidates command implementation.

use crate::cli::CandidatesArgs;
use crate::commands::parse_person;
use crate::config::LineageConfig;
use crate::error::Result;
use crate::output::Formatter;
use lineage_resolver::IdentityResolver;
use lineage_store::SqliteStore;

/// Execute the candidates command.
pub fn execute_candidates(
    args: CandidatesArgs,
    store: &SqliteStore,
    config: &LineageConfig,
    formatter: &Formatter,
) -> Result<()> {
    let person = parse_person(&args.person)?;
    let resolver = IdentityResolver::new(config.resolver.clone())?;

    let mut candidates = resolver.candidates(store, person)?;
    candidates.truncate(args.limit);

    println!(
        "{}",
        formatter.format_candidates(&candidates, resolver.config().merge_threshold)?
    );
    Ok(())
}
