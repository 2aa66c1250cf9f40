//! Summary of one resolution pass

use lineage_domain::RunId;
use serde::Serialize;

/// Counts reported by a resolution pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionSummary {
    /// Correlating run id, if any
    pub run_id: Option<RunId>,

    /// Persons whose candidates were generated
    pub persons_processed: usize,

    /// Persons absorbed earlier in the same pass
    pub persons_skipped: usize,

    /// Candidates scored across all persons
    pub candidates_evaluated: usize,

    /// Merges committed
    pub merges_performed: usize,

    /// Merges that would have been committed (dry run only)
    pub merges_proposed: usize,

    /// Wall-clock duration of the pass
    pub elapsed_ms: u64,
}

impl ResolutionSummary {
    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Identity Resolution Summary".to_string(),
            "===========================".to_string(),
        ];
        if let Some(run_id) = self.run_id {
            lines.push(format!("Run: {}", run_id));
        }
        lines.push(format!("Persons processed: {}", self.persons_processed));
        lines.push(format!("Persons skipped: {}", self.persons_skipped));
        lines.push(format!("Candidates evaluated: {}", self.candidates_evaluated));
        lines.push(format!("Merges performed: {}", self.merges_performed));
        if self.merges_proposed > 0 {
            lines.push(format!("Merges proposed (dry run): {}", self.merges_proposed));
        }
        lines.push(format!("Elapsed: {}ms", self.elapsed_ms));
        lines.join("\n")
    }
}
