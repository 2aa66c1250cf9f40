//! Merge audit records

use crate::{MergeEventId, PersonId, RunId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-feature similarity breakdown behind a composite score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureScores {
    /// Best token-set Jaccard similarity over name pairs
    pub name: f64,
    /// Agreement of birth and death dates
    pub dates: f64,
    /// Overlap of attached places
    pub places: f64,
    /// Overlap of related persons
    pub relationships: f64,
}

impl FeatureScores {
    /// Weight of the name feature
    pub const NAME_WEIGHT: f64 = 0.4;
    /// Weight of the date feature
    pub const DATES_WEIGHT: f64 = 0.3;
    /// Weight of the place feature
    pub const PLACES_WEIGHT: f64 = 0.2;
    /// Weight of the relationship feature
    pub const RELATIONSHIPS_WEIGHT: f64 = 0.1;

    /// Weighted composite: `0.4*name + 0.3*dates + 0.2*places + 0.1*relationships`
    pub fn composite(&self) -> f64 {
        Self::NAME_WEIGHT * self.name
            + Self::DATES_WEIGHT * self.dates
            + Self::PLACES_WEIGHT * self.places
            + Self::RELATIONSHIPS_WEIGHT * self.relationships
    }
}

/// How a merge decision was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Committed by the resolution engine
    Automatic,
    /// Committed by an operator
    Manual,
    /// Proposed but awaiting review
    Suggested,
}

impl MergeMethod {
    /// Get the method name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMethod::Automatic => "automatic",
            MergeMethod::Manual => "manual",
            MergeMethod::Suggested => "suggested",
        }
    }

    /// Parse a method from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "automatic" => Some(MergeMethod::Automatic),
            "manual" => Some(MergeMethod::Manual),
            "suggested" => Some(MergeMethod::Suggested),
            _ => None,
        }
    }
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit record of one committed merge
///
/// Created once per merge and never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeEvent {
    /// Unique identifier
    pub id: MergeEventId,

    /// Absorbed person
    pub source: PersonId,

    /// Surviving person
    pub target: PersonId,

    /// Composite similarity score
    pub confidence_score: f64,

    /// Feature breakdown behind the score
    pub features: FeatureScores,

    /// Human-readable explanation
    pub rationale: String,

    /// How the decision was made
    pub method: MergeMethod,

    /// Actor that committed the merge ("system" for the engine)
    pub performed_by: Option<String>,

    /// Correlating run id
    pub run_id: Option<RunId>,

    /// When the merge was committed (seconds since Unix epoch)
    pub created_at: u64,
}

impl MergeEvent {
    /// Build the audit record for an automatic merge
    pub fn automatic(
        source: PersonId,
        target: PersonId,
        features: FeatureScores,
        run_id: Option<RunId>,
    ) -> Self {
        let confidence_score = features.composite();
        Self {
            id: MergeEventId::new(),
            source,
            target,
            confidence_score,
            features,
            rationale: format!(
                "Automatic merge: score={:.3} (name={:.2}, dates={:.2}, places={:.2}, relationships={:.2})",
                confidence_score, features.name, features.dates, features.places, features.relationships
            ),
            method: MergeMethod::Automatic,
            performed_by: Some("system".to_string()),
            run_id,
            created_at: crate::unix_now(),
        }
    }

    /// Override the recorded actor
    pub fn performed_by(mut self, actor: impl Into<String>) -> Self {
        self.performed_by = Some(actor.into());
        self
    }
}
