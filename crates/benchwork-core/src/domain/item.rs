//! Dataset item definitions for the three task families.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One numeric word problem with its canonical ground-truth answer.
///
/// The answer is a string: usually numeric ("42", "3.5") but free-form
/// answers are tolerated and compared by case-insensitive equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MathItem {
    pub question: String,
    pub answer: String,
}

/// One grounded product question with the product record it is asked about.
///
/// Every field except `question` and `answer` defaults to empty; context
/// assembly omits empty fields. `specifications` is a `BTreeMap` so the
/// assembled context is order-stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductItem {
    #[serde(default)]
    pub product_id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub specifications: BTreeMap<String, String>,

    #[serde(default)]
    pub reviews: Vec<String>,

    #[serde(default)]
    pub price: String,

    #[serde(default)]
    pub category: String,

    pub question: String,

    pub answer: String,
}

/// Classification of a multi-step task, selecting its scoring rubric.
///
/// Unknown wire strings are preserved in `Other` and scored by the generic
/// completed/partial fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    DataPreprocessing,
    FeatureEngineering,
    ModelTraining,
    ModelEvaluation,
    Deployment,
    Other(String),
}

impl TaskType {
    /// Wire form of this task type.
    pub fn as_str(&self) -> &str {
        match self {
            TaskType::DataPreprocessing => "data_preprocessing",
            TaskType::FeatureEngineering => "feature_engineering",
            TaskType::ModelTraining => "model_training",
            TaskType::ModelEvaluation => "model_evaluation",
            TaskType::Deployment => "deployment",
            TaskType::Other(s) => s,
        }
    }
}

impl Default for TaskType {
    fn default() -> Self {
        TaskType::Other("unknown".to_string())
    }
}

impl From<String> for TaskType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "data_preprocessing" => TaskType::DataPreprocessing,
            "feature_engineering" => TaskType::FeatureEngineering,
            "model_training" => TaskType::ModelTraining,
            "model_evaluation" => TaskType::ModelEvaluation,
            "deployment" => TaskType::Deployment,
            _ => TaskType::Other(s),
        }
    }
}

impl From<TaskType> for String {
    fn from(t: TaskType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_max_score() -> f64 {
    100.0
}

/// One multi-step task specification for the rubric family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskItem {
    /// Human-readable task name.
    pub name: String,

    /// Task classification; selects the scoring rubric.
    #[serde(rename = "type", default)]
    pub task_type: TaskType,

    /// What the task asks the subject to do.
    #[serde(default)]
    pub description: String,

    /// Maximum achievable score. Must be positive.
    #[serde(default = "default_max_score")]
    pub max_score: f64,

    /// Requirements the subject is expected to satisfy.
    #[serde(default)]
    pub requirements: Vec<String>,

    /// Expected output shape, informational.
    #[serde(default)]
    pub expected_output: serde_json::Map<String, serde_json::Value>,
}

impl TaskItem {
    /// Structural validation beyond what serde enforces.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.max_score > 0.0 && self.max_score.is_finite()) {
            return Err(format!(
                "task '{}': max_score must be a positive number, got {}",
                self.name, self.max_score
            ));
        }
        Ok(())
    }
}

/// The rubric family's dataset file: tasks plus opaque named datasets.
///
/// `datasets` is passed through to the subject untouched;
/// `evaluation_metrics` is informational and plays no part in scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskDataset {
    #[serde(default)]
    pub tasks: Vec<TaskItem>,

    #[serde(default)]
    pub datasets: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub evaluation_metrics: serde_json::Map<String, serde_json::Value>,
}
