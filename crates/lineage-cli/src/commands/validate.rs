//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::commands::parse_person;
use crate::config::LineageConfig;
use crate::error::Result;
use crate::output::Formatter;
use lineage_store::SqliteStore;
use lineage_validator::Validator;

/// Execute the validate command.
pub fn execute_validate(
    args: ValidateArgs,
    store: &mut SqliteStore,
    config: &LineageConfig,
    formatter: &Formatter,
) -> Result<()> {
    let mut validation = config.validator.clone();
    if args.all_cycle_members {
        validation.report_all_cycle_members = true;
    }
    let validator = Validator::new(validation)?;

    let summary = match args.person {
        Some(raw) => validator.validate_person(store, parse_person(&raw)?)?,
        None => validator.validate_all(store)?,
    };

    println!("{}", formatter.format_validation(&summary)?);
    Ok(())
}
