//! Validation rule configuration

use crate::ValidationError;
use lineage_domain::Predicate;
use serde::{Deserialize, Serialize};

/// Configuration for a validation pass
///
/// Every rule can be switched off independently; thresholds are in years.
///
/// # Examples
///
/// ```
/// use lineage_validator::ValidationConfig;
///
/// let config = ValidationConfig::default();
/// assert_eq!(config.max_lifespan_years, 120.0);
///
/// // Only the hard impossibilities
/// let config = ValidationConfig::permissive();
/// assert!(!config.check_conflicting_claims);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Death before birth, or longer than `max_lifespan_years`
    pub check_lifespan: bool,

    /// Parent/child birth gaps
    pub check_generational_spacing: bool,

    /// Marriages outside the subject's lifetime
    pub check_temporal_consistency: bool,

    /// Distinct values for one predicate
    pub check_conflicting_claims: bool,

    /// Cycles in the parent graph
    pub check_circular_relationships: bool,

    /// Lifespans above this raise a warning
    /// Default: 120
    pub max_lifespan_years: f64,

    /// Parent/child gaps below this are errors
    /// Default: 10
    pub min_parent_gap_years: f64,

    /// Parent/child gaps above this raise a warning
    /// Default: 60
    pub max_parent_gap_years: f64,

    /// Flag every person on a detected cycle instead of only the walk's start node
    /// Default: false
    pub report_all_cycle_members: bool,

    /// Predicates that legitimately carry several values (never reported as conflicts)
    /// Default: empty
    pub conflict_exempt_predicates: Vec<Predicate>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_lifespan: true,
            check_generational_spacing: true,
            check_temporal_consistency: true,
            check_conflicting_claims: true,
            check_circular_relationships: true,
            max_lifespan_years: 120.0,
            min_parent_gap_years: 10.0,
            max_parent_gap_years: 60.0,
            report_all_cycle_members: false,
            conflict_exempt_predicates: Vec::new(),
        }
    }
}

impl ValidationConfig {
    /// Strict configuration: every rule, every cycle member reported
    pub fn strict() -> Self {
        Self {
            report_all_cycle_members: true,
            ..Self::default()
        }
    }

    /// Permissive configuration: skip the noisy heuristics
    pub fn permissive() -> Self {
        Self {
            check_conflicting_claims: false,
            check_generational_spacing: false,
            ..Self::default()
        }
    }

    /// Check that the thresholds are usable
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("max_lifespan_years", self.max_lifespan_years),
            ("min_parent_gap_years", self.min_parent_gap_years),
            ("max_parent_gap_years", self.max_parent_gap_years),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if self.min_parent_gap_years >= self.max_parent_gap_years {
            return Err(ValidationError::Config(format!(
                "min_parent_gap_years ({}) must be below max_parent_gap_years ({})",
                self.min_parent_gap_years, self.max_parent_gap_years
            )));
        }
        Ok(())
    }

    /// Whether any rule is switched on
    pub fn any_enabled(&self) -> bool {
        self.check_lifespan
            || self.check_generational_spacing
            || self.check_temporal_consistency
            || self.check_conflicting_claims
            || self.check_circular_relationships
    }
}
