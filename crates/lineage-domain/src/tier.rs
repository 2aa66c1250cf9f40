//! Confidence tier module - coarse buckets over claim confidence

use serde::{Deserialize, Serialize};

/// Coarse confidence bucket derived from a claim's [0, 1] score
///
/// - Definite: 1.0
/// - High: 0.8 - 0.99
/// - Moderate: 0.5 - 0.79
/// - Low: 0.2 - 0.49
/// - Speculative: below 0.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    /// Below 0.2
    Speculative,

    /// 0.2 to 0.49
    Low,

    /// 0.5 to 0.79
    Moderate,

    /// 0.8 to 0.99
    High,

    /// Exactly 1.0
    Definite,
}

impl ConfidenceTier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Speculative => "speculative",
            ConfidenceTier::Low => "low",
            ConfidenceTier::Moderate => "moderate",
            ConfidenceTier::High => "high",
            ConfidenceTier::Definite => "definite",
        }
    }

    /// Parse a tier from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "speculative" => Some(ConfidenceTier::Speculative),
            "low" => Some(ConfidenceTier::Low),
            "moderate" => Some(ConfidenceTier::Moderate),
            "high" => Some(ConfidenceTier::High),
            "definite" => Some(ConfidenceTier::Definite),
            _ => None,
        }
    }

    /// Bucket a numeric confidence score
    pub fn from_score(score: f64) -> Self {
        if score >= 1.0 {
            ConfidenceTier::Definite
        } else if score >= 0.8 {
            ConfidenceTier::High
        } else if score >= 0.5 {
            ConfidenceTier::Moderate
        } else if score >= 0.2 {
            ConfidenceTier::Low
        } else {
            ConfidenceTier::Speculative
        }
    }

    /// Representative score for a tier when only the tier is known
    pub fn nominal_score(&self) -> f64 {
        match self {
            ConfidenceTier::Definite => 1.0,
            ConfidenceTier::High => 0.9,
            ConfidenceTier::Moderate => 0.65,
            ConfidenceTier::Low => 0.35,
            ConfidenceTier::Speculative => 0.15,
        }
    }
}

impl std::str::FromStr for ConfidenceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid confidence tier: {}", s))
    }
}
