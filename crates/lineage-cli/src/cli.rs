//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use lineage_domain::{FlagKind, Severity};
use std::path::PathBuf;

/// LineageForge CLI - resolve duplicate persons and validate a genealogy database.
#[derive(Debug, Parser)]
#[command(name = "lineage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LINEAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database path (overrides [store] path)
    #[arg(long, global = true, env = "LINEAGE_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ids and counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an identity resolution pass
    Resolve(ResolveArgs),

    /// Run a validation pass
    Validate(ValidateArgs),

    /// Show ranked merge candidates for one person
    Candidates(CandidatesArgs),

    /// List merge audit records
    Merges(MergesArgs),

    /// List validation flags
    Flags(FlagsArgs),

    /// Mark a flag as resolved
    ResolveFlag(ResolveFlagArgs),

    /// Show record counts
    Stats,

    /// Load persons and claims from a JSON snapshot
    Load(LoadArgs),
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Minimum composite score for a merge (overrides config)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Maximum candidates per person (overrides config)
    #[arg(short, long)]
    pub max_candidates: Option<usize>,

    /// Score and count merges without writing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Validate a single person (cycle check skipped)
    #[arg(short, long)]
    pub person: Option<String>,

    /// Flag every person on a detected cycle
    #[arg(long)]
    pub all_cycle_members: bool,
}

/// Arguments for the candidates command.
#[derive(Debug, Parser)]
pub struct CandidatesArgs {
    /// Person id
    pub person: String,

    /// Maximum number of results
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for the merges command.
#[derive(Debug, Parser)]
pub struct MergesArgs {
    /// Maximum number of results (newest first)
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for the flags command.
#[derive(Debug, Parser)]
pub struct FlagsArgs {
    /// Filter by kind (e.g. lifespan_invalid)
    #[arg(short, long, value_parser = parse_flag_kind)]
    pub kind: Option<FlagKind>,

    /// Minimum severity (info, warning, error, critical)
    #[arg(short, long, value_parser = parse_severity)]
    pub severity: Option<Severity>,

    /// Only flags attached to this person or claim id
    #[arg(short, long)]
    pub entity: Option<String>,

    /// Include resolved flags
    #[arg(short, long)]
    pub all: bool,

    /// Maximum number of results
    #[arg(short, long, default_value = "50")]
    pub limit: usize,
}

/// Arguments for the resolve-flag command.
#[derive(Debug, Parser)]
pub struct ResolveFlagArgs {
    /// Flag id
    pub id: String,

    /// Resolution notes
    #[arg(short, long)]
    pub notes: Option<String>,
}

/// Arguments for the load command.
#[derive(Debug, Parser)]
pub struct LoadArgs {
    /// Snapshot file (JSON)
    pub file: PathBuf,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

fn parse_flag_kind(s: &str) -> Result<FlagKind, String> {
    FlagKind::parse(s).ok_or_else(|| format!("unknown flag kind '{}'", s))
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    Severity::parse(s).ok_or_else(|| format!("unknown severity '{}'", s))
}
