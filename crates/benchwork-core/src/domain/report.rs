//! The immutable report produced by every evaluation run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::outcome::ItemOutcome;

/// Result of one complete benchmark evaluation run.
///
/// Constructed exactly once per run by the accumulator and immutable
/// afterwards; it owns `detailed_results` exclusively. The serialized
/// field names are the stable persistence contract; renaming any of
/// them breaks saved reports.
///
/// # Invariants
///
/// - `total_items == detailed_results.len()`
/// - `accuracy == correct_count / total_items` (empty runs are rejected
///   upstream with `NotLoaded` rather than reported as zero)
/// - every outcome satisfies `0 <= score <= max_score`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkReport {
    /// Which benchmark produced this report.
    pub benchmark_name: String,

    /// Name reported by the subject under test.
    pub subject_name: String,

    /// Number of items evaluated.
    pub total_items: usize,

    /// Items that met their family's correctness threshold.
    pub correct_count: usize,

    /// `correct_count / total_items`.
    pub accuracy: f64,

    /// Wall-clock seconds measured around the whole evaluation loop.
    pub execution_time: f64,

    /// RFC 3339 timestamp of report construction.
    pub timestamp: String,

    /// Per-item outcomes in dataset order.
    pub detailed_results: Vec<ItemOutcome>,

    /// Family-specific summary statistics (confusion counts, completion
    /// rates, per-type accuracies, dataset digest, subject params).
    pub metadata: Map<String, Value>,
}

impl BenchmarkReport {
    /// Recompute accuracy from `detailed_results`, independent of the
    /// stored `accuracy`/`correct_count` fields.
    pub fn recomputed_accuracy(&self) -> f64 {
        if self.detailed_results.is_empty() {
            return 0.0;
        }
        let correct = self.detailed_results.iter().filter(|o| o.correct).count();
        correct as f64 / self.detailed_results.len() as f64
    }
}
