//! Stats command implementation.

use crate::error::Result;
use crate::output::Formatter;
use lineage_store::SqliteStore;

/// Execute the stats command.
pub fn execute_stats(store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_counts(&store.counts()?)?);
    Ok(())
}
