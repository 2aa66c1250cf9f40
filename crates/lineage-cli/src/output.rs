//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lineage_domain::{Flag, MergeEvent, Severity};
use lineage_resolver::{Candidate, ResolutionSummary};
use lineage_store::StoreCounts;
use lineage_validator::ValidationSummary;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a resolution pass summary.
    pub fn format_resolution(&self, summary: &ResolutionSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Table => Ok(summary.summary()),
            OutputFormat::Quiet => Ok(summary.merges_performed.to_string()),
        }
    }

    /// Format a validation pass summary.
    pub fn format_validation(&self, summary: &ValidationSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Table => Ok(summary.summary()),
            OutputFormat::Quiet => Ok(summary.flags_created.to_string()),
        }
    }

    /// Format ranked merge candidates.
    pub fn format_candidates(&self, candidates: &[Candidate], threshold: f64) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(candidates)?),
            OutputFormat::Quiet => Ok(join_lines(candidates.iter().map(|c| c.person.to_string()))),
            OutputFormat::Table => {
                if candidates.is_empty() {
                    return Ok(self.colorize("No candidates found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Person", "Score", "Name", "Dates", "Places", "Relations", "Merge"]);
                for c in candidates {
                    let merge = if c.score >= threshold {
                        self.colorize("yes", "green")
                    } else {
                        "no".to_string()
                    };
                    builder.push_record([
                        c.person.to_string(),
                        format!("{:.3}", c.score),
                        format!("{:.2}", c.features.name),
                        format!("{:.2}", c.features.dates),
                        format!("{:.2}", c.features.places),
                        format!("{:.2}", c.features.relationships),
                        merge,
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format merge audit records.
    pub fn format_merges(&self, events: &[MergeEvent]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(events)?),
            OutputFormat::Quiet => Ok(join_lines(events.iter().map(|e| e.id.to_string()))),
            OutputFormat::Table => {
                if events.is_empty() {
                    return Ok(self.colorize("No merges recorded.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Source", "Target", "Score", "Method", "By"]);
                for e in events {
                    builder.push_record([
                        short_id(&e.id.to_string()),
                        e.source.to_string(),
                        e.target.to_string(),
                        format!("{:.3}", e.confidence_score),
                        e.method.to_string(),
                        e.performed_by.clone().unwrap_or_default(),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format validation flags.
    pub fn format_flags(&self, flags: &[Flag]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(flags)?),
            OutputFormat::Quiet => Ok(join_lines(flags.iter().map(|f| f.id.to_string()))),
            OutputFormat::Table => {
                if flags.is_empty() {
                    return Ok(self.colorize("No flags found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Severity", "Kind", "Entity", "Message", "Resolved"]);
                for f in flags {
                    builder.push_record([
                        f.id.to_string(),
                        self.severity(f.severity),
                        f.kind.to_string(),
                        format!("{} {}", f.entity_kind.as_str(), f.entity_uuid()),
                        f.message.clone(),
                        if f.resolved { "yes".to_string() } else { "no".to_string() },
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format store record counts.
    pub fn format_counts(&self, counts: &StoreCounts) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(counts)?),
            OutputFormat::Quiet => Ok(counts.active_persons.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Record", "Total", "Active"]);
                builder.push_record([
                    "persons".to_string(),
                    counts.persons.to_string(),
                    counts.active_persons.to_string(),
                ]);
                builder.push_record([
                    "claims".to_string(),
                    counts.claims.to_string(),
                    counts.active_claims.to_string(),
                ]);
                builder.push_record([
                    "merge events".to_string(),
                    counts.merge_events.to_string(),
                    "-".to_string(),
                ]);
                builder.push_record([
                    "flags".to_string(),
                    counts.flags.to_string(),
                    counts.unresolved_flags.to_string(),
                ]);
                Ok(render(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn severity(&self, severity: Severity) -> String {
        let color = match severity {
            Severity::Critical => "magenta",
            Severity::Error => "red",
            Severity::Warning => "yellow",
            Severity::Info => "blue",
        };
        self.colorize(severity.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn join_lines(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join("\n")
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
