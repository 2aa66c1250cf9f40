//! LineageForge CLI - run resolution and validation passes against a SQLite database.

use clap::Parser;
use lineage_cli::commands;
use lineage_cli::{logging, Cli, Command, Formatter, LineageConfig};
use lineage_store::SqliteStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> lineage_cli::Result<()> {
    let cli = Cli::parse();

    let mut config = LineageConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.store.path = db;
    }

    logging::init(&config.logging.level);

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let formatter = Formatter::new(format, !cli.no_color && config.output.color);

    let mut store = SqliteStore::new(&config.store.path)?;
    tracing::debug!(path = %config.store.path.display(), "opened store");

    match cli.command {
        Command::Resolve(args) => commands::execute_resolve(args, &mut store, &config, &formatter)?,
        Command::Validate(args) => commands::execute_validate(args, &mut store, &config, &formatter)?,
        Command::Candidates(args) => commands::execute_candidates(args, &store, &config, &formatter)?,
        Command::Merges(args) => commands::execute_merges(args, &store, &formatter)?,
        Command::Flags(args) => commands::execute_flags(args, &store, &formatter)?,
        Command::ResolveFlag(args) => commands::execute_resolve_flag(args, &mut store, &formatter)?,
        Command::Stats => commands::execute_stats(&store, &formatter)?,
        Command::Load(args) => commands::execute_load(args, &mut store, &formatter)?,
    }

    Ok(())
}
