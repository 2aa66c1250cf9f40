//! Validation flags - stored anomaly reports

use crate::FlagId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Anomaly taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    /// Death before birth, or an implausibly long life
    LifespanInvalid,
    /// Parent/child birth gap outside the plausible range
    GenerationalSpacingInvalid,
    /// Event dated outside the subject's lifetime
    TemporalImpossibility,
    /// Person is their own ancestor
    CircularRelationship,
    /// Multiple distinct values asserted for one predicate
    ConflictingClaims,
    /// Reserved: expected data is absent
    MissingCriticalData,
    /// Reserved: heuristic anomaly
    SuspiciousPattern,
}

impl FlagKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagKind::LifespanInvalid => "lifespan_invalid",
            FlagKind::GenerationalSpacingInvalid => "generational_spacing_invalid",
            FlagKind::TemporalImpossibility => "temporal_impossibility",
            FlagKind::CircularRelationship => "circular_relationship",
            FlagKind::ConflictingClaims => "conflicting_claims",
            FlagKind::MissingCriticalData => "missing_critical_data",
            FlagKind::SuspiciousPattern => "suspicious_pattern",
        }
    }

    /// Parse a kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "lifespan_invalid" => Some(FlagKind::LifespanInvalid),
            "generational_spacing_invalid" => Some(FlagKind::GenerationalSpacingInvalid),
            "temporal_impossibility" => Some(FlagKind::TemporalImpossibility),
            "circular_relationship" => Some(FlagKind::CircularRelationship),
            "conflicting_claims" => Some(FlagKind::ConflictingClaims),
            "missing_critical_data" => Some(FlagKind::MissingCriticalData),
            "suspicious_pattern" => Some(FlagKind::SuspiciousPattern),
            _ => None,
        }
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flag severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Suspicious but possible
    Warning,
    /// Logically impossible
    Error,
    /// Structurally corrupt graph
    Critical,
}

impl Severity {
    /// Get the severity name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    /// Parse a severity from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of record a flag points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A person record
    Person,
    /// A single claim
    Claim,
    /// A relationship between persons
    Relationship,
}

impl EntityKind {
    /// Get the entity kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Claim => "claim",
            EntityKind::Relationship => "relationship",
        }
    }

    /// Parse an entity kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "person" => Some(EntityKind::Person),
            "claim" => Some(EntityKind::Claim),
            "relationship" => Some(EntityKind::Relationship),
            _ => None,
        }
    }
}

/// A stored anomaly report
///
/// Flags never block normal operation. Resolution is an administrative action
/// recorded through `resolved`, `resolved_at` and `resolution_notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    /// Unique identifier
    pub id: FlagId,

    /// Anomaly class
    pub kind: FlagKind,

    /// How bad it is
    pub severity: Severity,

    /// Kind of the flagged record
    pub entity_kind: EntityKind,

    /// Raw id of the flagged record
    #[serde(with = "uuid_string")]
    pub entity_id: u128,

    /// Human-readable description
    pub message: String,

    /// Structured evidence
    pub details: serde_json::Value,

    /// Whether an operator has dealt with it
    pub resolved: bool,

    /// When it was resolved (seconds since Unix epoch)
    pub resolved_at: Option<u64>,

    /// Operator notes
    pub resolution_notes: Option<String>,

    /// When it was raised (seconds since Unix epoch)
    pub created_at: u64,
}

impl Flag {
    /// Create an unresolved flag
    pub fn new(
        kind: FlagKind,
        severity: Severity,
        entity_kind: EntityKind,
        entity_id: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: FlagId::new(),
            kind,
            severity,
            entity_kind,
            entity_id,
            message: message.into(),
            details: serde_json::Value::Object(serde_json::Map::new()),
            resolved: false,
            resolved_at: None,
            resolution_notes: None,
            created_at: crate::unix_now(),
        }
    }

    /// Attach a structured details payload
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Flagged record id rendered as a UUID string
    pub fn entity_uuid(&self) -> String {
        uuid::Uuid::from_u128(self.entity_id).to_string()
    }
}

mod uuid_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&uuid::Uuid::from_u128(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        uuid::Uuid::parse_str(&s)
            .map(|u| u.as_u128())
            .map_err(serde::de::Error::custom)
    }
}
