//! Flags and resolve-flag command implementations.

use crate::cli::{FlagsArgs, ResolveFlagArgs};
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lineage_domain::{FlagId, PersonId};
use lineage_store::{FlagQuery, SqliteStore};

/// Execute the flags command.
pub fn execute_flags(args: FlagsArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let flags = store.list_flags(&build_query(&args)?)?;
    println!("{}", formatter.format_flags(&flags)?);
    Ok(())
}

/// Execute the resolve-flag command.
pub fn execute_resolve_flag(
    args: ResolveFlagArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    let id = FlagId::from_string(&args.id).map_err(CliError::InvalidInput)?;
    let flag = store.resolve_flag(id, args.notes.as_deref())?;

    match formatter.format() {
        OutputFormat::Table => println!("{}", formatter.success(&format!("Resolved flag {}", flag.id))),
        _ => println!("{}", formatter.format_flags(&[flag])?),
    }
    Ok(())
}

/// Translate command-line filters into a store query.
pub fn build_query(args: &FlagsArgs) -> Result<FlagQuery> {
    let entity_id = match &args.entity {
        // persons and claims share the UUID text form
        Some(raw) => Some(
            PersonId::from_string(raw)
                .map_err(|_| CliError::InvalidInput(format!("Invalid entity id '{}'", raw)))?
                .value(),
        ),
        None => None,
    };

    Ok(FlagQuery {
        kind: args.kind,
        min_severity: args.severity,
        entity_id,
        unresolved_only: !args.all,
        limit: Some(args.limit),
    })
}
