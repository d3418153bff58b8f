//! Subject-under-test capability contracts.
//!
//! A subject is opaque beyond one narrow capability: free-form text
//! generation for the question-answering families, or structured task
//! execution for the rubric family. Subjects bound their own latency;
//! the harness imposes no timeout, and a subject error on one item never
//! aborts the run.

use async_trait::async_trait;
use serde_json::{Map, Value};

use benchwork_core::domain::item::TaskItem;

/// A subject that produces free-form text for a prompt.
#[async_trait]
pub trait TextSubject: Send + Sync {
    /// Display name recorded in reports.
    fn name(&self) -> &str {
        "unknown"
    }

    /// Produce a response for the prompt.
    ///
    /// `params` is the opaque caller-supplied parameter bag forwarded
    /// from `EvalOptions`, untouched by the harness.
    async fn generate(&self, prompt: &str, params: &Value) -> anyhow::Result<String>;
}

/// A subject that executes a structured task against named datasets.
#[async_trait]
pub trait TaskSubject: Send + Sync {
    /// Display name recorded in reports.
    fn name(&self) -> &str {
        "unknown"
    }

    /// Execute one task.
    ///
    /// `datasets` is passed through from the dataset file untouched.
    /// `Ok(None)` means the subject produced no result, which scores
    /// zero regardless of task type.
    async fn execute_task(
        &self,
        task: &TaskItem,
        datasets: &Map<String, Value>,
        params: &Value,
    ) -> anyhow::Result<Option<Map<String, Value>>>;
}
