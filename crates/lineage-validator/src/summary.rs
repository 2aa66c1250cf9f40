//! Summary of one validation pass

use lineage_domain::FlagKind;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts reported by a validation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationSummary {
    /// Active persons the per-person rules ran over
    pub persons_validated: usize,

    /// Flags written
    pub flags_created: usize,

    /// Flags written, by kind
    pub flags_by_kind: BTreeMap<FlagKind, usize>,

    /// Wall-clock duration of the pass
    pub elapsed_ms: u64,
}

impl ValidationSummary {
    pub(crate) fn record(&mut self, kind: FlagKind, count: usize) {
        if count == 0 {
            return;
        }
        self.flags_created += count;
        *self.flags_by_kind.entry(kind).or_default() += count;
    }

    /// Flags written for one kind
    pub fn count(&self, kind: FlagKind) -> usize {
        self.flags_by_kind.get(&kind).copied().unwrap_or(0)
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Validation Summary".to_string(),
            "==================".to_string(),
            format!("Persons validated: {}", self.persons_validated),
            format!("Flags created: {}", self.flags_created),
        ];
        for (kind, count) in &self.flags_by_kind {
            lines.push(format!("  {}: {}", kind, count));
        }
        lines.push(format!("Elapsed: {}ms", self.elapsed_ms));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates_by_kind() {
        let mut summary = ValidationSummary::default();
        summary.record(FlagKind::LifespanInvalid, 2);
        summary.record(FlagKind::ConflictingClaims, 1);
        summary.record(FlagKind::LifespanInvalid, 1);
        summary.record(FlagKind::CircularRelationship, 0);

        assert_eq!(summary.flags_created, 4);
        assert_eq!(summary.count(FlagKind::LifespanInvalid), 3);
        assert_eq!(summary.count(FlagKind::CircularRelationship), 0);
        assert!(!summary.flags_by_kind.contains_key(&FlagKind::CircularRelationship));
    }

    #[test]
    fn test_summary_text_lists_kinds() {
        let mut summary = ValidationSummary {
            persons_validated: 12,
            ..Default::default()
        };
        summary.record(FlagKind::ConflictingClaims, 3);
        let text = summary.summary();
        assert!(text.contains("Persons validated: 12"));
        assert!(text.contains("conflicting_claims: 3"));
    }

    #[test]
    fn test_summary_serializes_kind_keys() {
        let mut summary = ValidationSummary::default();
        summary.record(FlagKind::TemporalImpossibility, 1);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["flags_by_kind"]["temporal_impossibility"], 1);
    }
}
