//! Merges command implementation.

use crate::cli::MergesArgs;
use crate::error::Result;
use crate::output::Formatter;
use lineage_store::SqliteStore;

/// Execute the merges command.
pub fn execute_merges(args: MergesArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let events = store.list_merge_events(Some(args.limit))?;
    println!("{}", formatter.format_merges(&events)?);
    Ok(())
}
