//! Weighted-rubric scoring for the multi-step task family.
//!
//! Each known task type maps to a fixed weighted checklist; every
//! satisfied check contributes its weight times the task's `max_score`,
//! summed and capped at `max_score`. Types without a checklist fall back
//! to flat completed/partial credit. Adding a task type means adding a
//! table and one `checklist_for` arm; the scoring walk never changes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::item::{TaskItem, TaskType};

/// A single checklist signal probed in the subject's result map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Field must be present and truthy.
    Flag(&'static str),
    /// Field must be a non-empty array.
    NonEmptyList(&'static str),
    /// Field must be a non-empty map.
    NonEmptyMap(&'static str),
}

/// Checklist for data-preprocessing tasks.
pub const DATA_PREPROCESSING_CHECKS: &[(Check, f64)] = &[
    (Check::Flag("data_cleaned"), 0.3),
    (Check::Flag("missing_values_handled"), 0.2),
    (Check::Flag("outliers_handled"), 0.2),
    (Check::Flag("data_validated"), 0.3),
];

/// Checklist for feature-engineering tasks.
pub const FEATURE_ENGINEERING_CHECKS: &[(Check, f64)] = &[
    (Check::NonEmptyList("new_features"), 0.4),
    (Check::Flag("feature_selection_performed"), 0.3),
    (Check::Flag("feature_scaling_applied"), 0.3),
];

/// Checklist for model-training tasks.
pub const MODEL_TRAINING_CHECKS: &[(Check, f64)] = &[
    (Check::Flag("model_trained"), 0.4),
    (Check::Flag("hyperparameter_tuning"), 0.3),
    (Check::Flag("cross_validation_used"), 0.3),
];

/// Checklist for model-evaluation tasks.
pub const MODEL_EVALUATION_CHECKS: &[(Check, f64)] = &[
    (Check::NonEmptyMap("metrics"), 0.5),
    (Check::Flag("performance_analysis"), 0.3),
    (Check::Flag("business_impact_considered"), 0.2),
];

/// Checklist for deployment tasks.
pub const DEPLOYMENT_CHECKS: &[(Check, f64)] = &[
    (Check::Flag("deployment_strategy"), 0.4),
    (Check::Flag("monitoring_setup"), 0.3),
    (Check::Flag("rollback_plan"), 0.3),
];

/// Credit multiplier for unlisted task types reporting full completion.
pub const GENERIC_COMPLETED_CREDIT: f64 = 0.8;

/// Credit multiplier for unlisted task types reporting partial completion.
pub const GENERIC_PARTIAL_CREDIT: f64 = 0.5;

/// Look up the checklist for a task type.
///
/// `None` selects the generic completed/partial fallback.
pub fn checklist_for(task_type: &TaskType) -> Option<&'static [(Check, f64)]> {
    match task_type {
        TaskType::DataPreprocessing => Some(DATA_PREPROCESSING_CHECKS),
        TaskType::FeatureEngineering => Some(FEATURE_ENGINEERING_CHECKS),
        TaskType::ModelTraining => Some(MODEL_TRAINING_CHECKS),
        TaskType::ModelEvaluation => Some(MODEL_EVALUATION_CHECKS),
        TaskType::Deployment => Some(DEPLOYMENT_CHECKS),
        TaskType::Other(_) => None,
    }
}

/// Truthiness of a JSON value: null, false, zero, and empty
/// strings/arrays/maps are falsy, everything else is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn check_satisfied(check: &Check, result: &Map<String, Value>) -> bool {
    match check {
        Check::Flag(field) => result.get(*field).map(is_truthy).unwrap_or(false),
        Check::NonEmptyList(field) => {
            matches!(result.get(*field), Some(Value::Array(items)) if !items.is_empty())
        }
        Check::NonEmptyMap(field) => {
            matches!(result.get(*field), Some(Value::Object(map)) if !map.is_empty())
        }
    }
}

/// Score a subject's result map against a task's rubric.
///
/// A missing result scores 0 regardless of task type. The sum of
/// satisfied check weights is capped at the task's `max_score`.
pub fn score_task_result(task: &TaskItem, result: Option<&Map<String, Value>>) -> f64 {
    let Some(result) = result else {
        return 0.0;
    };

    match checklist_for(&task.task_type) {
        Some(checks) => {
            let mut score = 0.0;
            for (check, weight) in checks {
                if check_satisfied(check, result) {
                    score += weight * task.max_score;
                }
            }
            score.min(task.max_score)
        }
        None => {
            if result.get("completed").map(is_truthy).unwrap_or(false) {
                GENERIC_COMPLETED_CREDIT * task.max_score
            } else if result
                .get("partial_completion")
                .map(is_truthy)
                .unwrap_or(false)
            {
                GENERIC_PARTIAL_CREDIT * task.max_score
            } else {
                0.0
            }
        }
    }
}

/// Build evaluation notes from advisory fields in a subject result.
///
/// Collects `error`, `warnings`, and `recommendations` when present,
/// joined with "; ". Returns "No specific notes" when none apply.
pub fn evaluation_notes(result: Option<&Map<String, Value>>) -> String {
    let mut notes = Vec::new();

    if let Some(result) = result {
        for (field, label) in [
            ("error", "Error"),
            ("warnings", "Warnings"),
            ("recommendations", "Recommendations"),
        ] {
            if let Some(value) = result.get(field).filter(|v| is_truthy(v)) {
                notes.push(format!("{label}: {}", display_value(value)));
            }
        }
    }

    if notes.is_empty() {
        "No specific notes".to_string()
    } else {
        notes.join("; ")
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Completion buckets
// ---------------------------------------------------------------------------

/// Score fraction at or above which a task counts as completed.
pub const COMPLETED_THRESHOLD: f64 = 0.9;

/// Score fraction at or above which a task counts as partial.
pub const PARTIAL_THRESHOLD: f64 = 0.5;

/// Completion bucket for one scored task, relative to its own `max_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionBucket {
    Completed,
    Partial,
    Failed,
}

/// Bucket a score against the item's own maximum.
///
/// `score >= 0.9 * max_score` is completed, `[0.5, 0.9)` is partial,
/// anything lower is failed. Both boundaries are inclusive at the bottom.
pub fn bucket_for_score(score: f64, max_score: f64) -> CompletionBucket {
    if score >= COMPLETED_THRESHOLD * max_score {
        CompletionBucket::Completed
    } else if score >= PARTIAL_THRESHOLD * max_score {
        CompletionBucket::Partial
    } else {
        CompletionBucket::Failed
    }
}

/// Per-run tally of completion buckets.
///
/// The three counts always sum to the number of recorded tasks, so the
/// corresponding rates sum to 1 within floating tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTally {
    pub completed: usize,
    pub partial: usize,
    pub failed: usize,
}

impl CompletionTally {
    /// Record one bucketed task.
    pub fn record(&mut self, bucket: CompletionBucket) {
        match bucket {
            CompletionBucket::Completed => self.completed += 1,
            CompletionBucket::Partial => self.partial += 1,
            CompletionBucket::Failed => self.failed += 1,
        }
    }

    /// Total tasks recorded.
    pub fn total(&self) -> usize {
        self.completed + self.partial + self.failed
    }

    /// Completed fraction, 0 when nothing is recorded.
    pub fn completed_rate(&self) -> f64 {
        self.rate(self.completed)
    }

    /// Partial fraction, 0 when nothing is recorded.
    pub fn partial_rate(&self) -> f64 {
        self.rate(self.partial)
    }

    /// Failed fraction, 0 when nothing is recorded.
    pub fn failure_rate(&self) -> f64 {
        self.rate(self.failed)
    }

    fn rate(&self, count: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    }
}
