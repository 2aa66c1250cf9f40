//! Configuration for identity resolution passes

use crate::ResolutionError;
use serde::{Deserialize, Serialize};

/// Configuration for the identity resolver
///
/// # Examples
///
/// ```
/// use lineage_resolver::ResolverConfig;
///
/// // Default configuration (balanced)
/// let config = ResolverConfig::default();
/// assert_eq!(config.merge_threshold, 0.75);
///
/// // Fewer, safer merges
/// let config = ResolverConfig::strict();
/// assert_eq!(config.merge_threshold, 0.85);
///
/// // More aggressive deduplication
/// let config = ResolverConfig::lenient();
/// assert_eq!(config.merge_threshold, 0.65);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum composite score for an automatic merge
    /// Default: 0.75
    pub merge_threshold: f64,

    /// Maximum candidates kept per person
    /// Default: 100
    pub max_candidates: usize,

    /// Shared name tokens needed for two persons to be compared at all
    /// Default: 2
    pub min_shared_tokens: usize,

    /// Actor recorded on merge events
    /// Default: "system"
    pub performed_by: String,

    /// Dry-run mode: score and count merges without writing them
    /// Default: false
    pub dry_run: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            merge_threshold: 0.75,
            max_candidates: 100,
            min_shared_tokens: 2,
            performed_by: "system".to_string(),
            dry_run: false,
        }
    }
}

impl ResolverConfig {
    /// Strict configuration: only near-certain duplicates are merged
    pub fn strict() -> Self {
        Self {
            merge_threshold: 0.85,
            ..Self::default()
        }
    }

    /// Lenient configuration: merges weaker matches
    pub fn lenient() -> Self {
        Self {
            merge_threshold: 0.65,
            ..Self::default()
        }
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<(), ResolutionError> {
        if !self.merge_threshold.is_finite() || !(0.0..=1.0).contains(&self.merge_threshold) {
            return Err(ResolutionError::Config(format!(
                "merge_threshold must be within [0, 1], got {}",
                self.merge_threshold
            )));
        }
        if self.max_candidates == 0 {
            return Err(ResolutionError::Config(
                "max_candidates must be at least 1".to_string(),
            ));
        }
        if self.min_shared_tokens == 0 {
            return Err(ResolutionError::Config(
                "min_shared_tokens must be at least 1".to_string(),
            ));
        }
        if self.performed_by.trim().is_empty() {
            return Err(ResolutionError::Config(
                "performed_by must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
