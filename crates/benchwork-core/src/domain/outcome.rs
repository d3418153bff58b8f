//! Per-item evaluation outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Record of what one dataset item produced when evaluated.
///
/// Outcomes live inside `BenchmarkReport::detailed_results` in dataset
/// order; `item_id` is the item's zero-based dataset position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemOutcome {
    /// Zero-based position of the item in the dataset.
    pub item_id: usize,

    /// Raw text output (text families; `null` for the rubric family and
    /// for items whose subject invocation failed).
    pub raw_output: Value,

    /// Extracted answer (text families) or the subject's structured
    /// result (rubric family).
    pub extracted: Value,

    /// Score awarded.
    pub score: f64,

    /// Maximum achievable score for this item.
    pub max_score: f64,

    /// Whether the item met its family's correctness threshold.
    pub correct: bool,

    /// Free-form evaluation notes.
    #[serde(default)]
    pub notes: String,

    /// Error captured when the subject failed on this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemOutcome {
    /// Outcome for an item whose subject invocation failed.
    ///
    /// Scores zero and records the error; the evaluation loop continues
    /// with the next item.
    pub fn failed(item_id: usize, max_score: f64, error: impl Into<String>) -> Self {
        Self {
            item_id,
            raw_output: Value::Null,
            extracted: Value::Null,
            score: 0.0,
            max_score,
            correct: false,
            notes: String::new(),
            error: Some(error.into()),
        }
    }
}
