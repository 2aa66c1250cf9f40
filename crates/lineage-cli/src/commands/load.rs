//! Load command implementation.

use crate::cli::LoadArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::snapshot::Snapshot;
use lineage_store::SqliteStore;
use std::fs;

/// Execute the load command.
pub fn execute_load(args: LoadArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    let text = fs::read_to_string(&args.file)?;
    let report = Snapshot::from_json(&text)?.load_into(store)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Loaded {} person(s) and {} claim(s) from {}",
            report.persons,
            report.claims,
            args.file.display()
        ))
    );
    Ok(())
}
