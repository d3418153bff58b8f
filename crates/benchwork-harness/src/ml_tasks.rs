//! Multi-step ML operations benchmark (rubric family).
//!
//! Each task is handed to the subject with the dataset file's opaque
//! `datasets` map; the structured result is scored against the task
//! type's weighted checklist and bucketed as completed, partial, or
//! failed against the task's own `max_score`.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::info;
use uuid::Uuid;

use benchwork_core::domain::digest::DatasetDigest;
use benchwork_core::domain::error::BenchworkError;
use benchwork_core::domain::item::{TaskDataset, TaskItem};
use benchwork_core::domain::outcome::ItemOutcome;
use benchwork_core::domain::report::BenchmarkReport;
use benchwork_core::domain::Result;
use benchwork_core::obs;
use benchwork_core::scorers::rubric::{
    bucket_for_score, evaluation_notes, score_task_result, CompletionBucket, CompletionTally,
};

use crate::accum::RunAccumulator;
use crate::benchmark::{parse_dataset, read_dataset, Benchmark, EvalOptions};
use crate::subject::TaskSubject;

/// Stable name recorded in reports.
pub const BENCHMARK_NAME: &str = "ml_tasks";

/// Rubric-graded multi-step tasks for ML agents.
#[derive(Debug, Default)]
pub struct MlTaskBenchmark {
    data: Option<TaskDataset>,
    dataset_digest: Option<DatasetDigest>,
}

/// Dataset statistics for the rubric family.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MlTaskStats {
    pub total_tasks: usize,
    pub task_type_counts: BTreeMap<String, usize>,
    pub total_max_score: f64,
    pub dataset_names: Vec<String>,
    pub metric_names: Vec<String>,
}

/// Per-task-type score accumulation within one run.
#[derive(Debug, Default, Clone, Copy)]
struct TypeTally {
    score: f64,
    max: f64,
    count: usize,
}

impl MlTaskBenchmark {
    pub fn new() -> Self {
        Self::default()
    }

    /// First `min(n, len)` tasks, for inspection.
    pub fn sample_items(&self, n: usize) -> &[TaskItem] {
        match &self.data {
            Some(data) => &data.tasks[..n.min(data.tasks.len())],
            None => &[],
        }
    }

    /// Statistics over the loaded dataset.
    pub fn statistics(&self) -> Result<MlTaskStats> {
        let data = self.loaded_data()?;

        let mut task_type_counts = BTreeMap::new();
        for task in &data.tasks {
            *task_type_counts
                .entry(task.task_type.to_string())
                .or_insert(0) += 1;
        }

        Ok(MlTaskStats {
            total_tasks: data.tasks.len(),
            task_type_counts,
            total_max_score: data.tasks.iter().map(|t| t.max_score).sum(),
            dataset_names: data.datasets.keys().cloned().collect(),
            metric_names: data.evaluation_metrics.keys().cloned().collect(),
        })
    }

    fn loaded_data(&self) -> Result<&TaskDataset> {
        match &self.data {
            Some(data) if !data.tasks.is_empty() => Ok(data),
            _ => Err(BenchworkError::NotLoaded {
                benchmark: BENCHMARK_NAME.to_string(),
            }),
        }
    }
}

#[async_trait]
impl Benchmark for MlTaskBenchmark {
    type Subject = dyn TaskSubject;

    fn name(&self) -> &str {
        BENCHMARK_NAME
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let raw = read_dataset(path)?;
        let data: TaskDataset = parse_dataset(path, &raw)?;

        for task in &data.tasks {
            task.validate()
                .map_err(|reason| BenchworkError::DatasetMalformed {
                    path: path.to_path_buf(),
                    reason,
                })?;
        }

        let digest = DatasetDigest::from_bytes(raw.as_bytes());
        info!(
            benchmark = BENCHMARK_NAME,
            tasks = data.tasks.len(),
            datasets = data.datasets.len(),
            digest = %digest.short(),
            "dataset loaded"
        );

        self.data = Some(data);
        self.dataset_digest = Some(digest);
        Ok(())
    }

    async fn evaluate(
        &self,
        subject: &dyn TaskSubject,
        opts: &EvalOptions,
    ) -> Result<BenchmarkReport> {
        let data = self.loaded_data()?;
        let count = opts.effective_items(data.tasks.len());

        let run_id = Uuid::new_v4().to_string();
        obs::emit_eval_started(&run_id, BENCHMARK_NAME, subject.name(), count);

        let mut accum = RunAccumulator::start(BENCHMARK_NAME, subject.name());
        let mut tally = CompletionTally::default();
        let mut type_tallies: BTreeMap<String, TypeTally> = BTreeMap::new();
        let mut total_score = 0.0;
        let mut max_possible_score = 0.0;

        for (item_id, task) in data.tasks[..count].iter().enumerate() {
            let type_tally = type_tallies.entry(task.task_type.to_string()).or_default();
            type_tally.count += 1;
            type_tally.max += task.max_score;
            max_possible_score += task.max_score;

            match subject.execute_task(task, &data.datasets, &opts.params).await {
                Ok(result) => {
                    let score = score_task_result(task, result.as_ref());
                    let bucket = bucket_for_score(score, task.max_score);
                    let correct = bucket == CompletionBucket::Completed;
                    let notes = format!(
                        "task: {}; type: {}; {}",
                        task.name,
                        task.task_type,
                        evaluation_notes(result.as_ref())
                    );

                    tally.record(bucket);
                    type_tally.score += score;
                    total_score += score;

                    obs::emit_item_scored(&run_id, item_id, score, correct);
                    accum.record(ItemOutcome {
                        item_id,
                        raw_output: Value::Null,
                        extracted: match result {
                            Some(map) => Value::Object(map),
                            None => Value::Null,
                        },
                        score,
                        max_score: task.max_score,
                        correct,
                        notes,
                        error: None,
                    });
                }
                Err(e) => {
                    tally.record(CompletionBucket::Failed);
                    let err = BenchworkError::SubjectInvocation {
                        item_id,
                        message: e.to_string(),
                    };
                    obs::emit_item_failed(&run_id, item_id, &err);
                    accum.record(ItemOutcome::failed(item_id, task.max_score, err.to_string()));
                }
            }
        }

        let weighted_accuracy = if max_possible_score > 0.0 {
            total_score / max_possible_score
        } else {
            0.0
        };

        let mut task_type_accuracies = Map::new();
        let mut task_type_counts = Map::new();
        for (task_type, t) in &type_tallies {
            let accuracy = if t.max > 0.0 { t.score / t.max } else { 0.0 };
            task_type_accuracies.insert(task_type.clone(), json!(accuracy));
            task_type_counts.insert(task_type.clone(), json!(t.count));
        }

        let mut metadata = Map::new();
        metadata.insert(
            "max_items".to_string(),
            json!(opts.max_items.map(NonZeroUsize::get)),
        );
        metadata.insert("subject_params".to_string(), opts.params.clone());
        metadata.insert("total_score".to_string(), json!(total_score));
        metadata.insert(
            "max_possible_score".to_string(),
            json!(max_possible_score),
        );
        metadata.insert("weighted_accuracy".to_string(), json!(weighted_accuracy));
        metadata.insert("completed_tasks".to_string(), json!(tally.completed));
        metadata.insert("partial_tasks".to_string(), json!(tally.partial));
        metadata.insert("failed_tasks".to_string(), json!(tally.failed));
        metadata.insert(
            "task_completion_rate".to_string(),
            json!(tally.completed_rate()),
        );
        metadata.insert(
            "partial_completion_rate".to_string(),
            json!(tally.partial_rate()),
        );
        metadata.insert("failure_rate".to_string(), json!(tally.failure_rate()));
        metadata.insert(
            "task_type_accuracies".to_string(),
            Value::Object(task_type_accuracies),
        );
        metadata.insert(
            "task_type_counts".to_string(),
            Value::Object(task_type_counts),
        );
        if let Some(digest) = &self.dataset_digest {
            metadata.insert("dataset_digest".to_string(), json!(digest.as_str()));
        }

        let report = accum.finish(metadata);
        obs::emit_eval_finished(
            &run_id,
            report.total_items,
            report.correct_count,
            report.accuracy,
            (report.execution_time * 1000.0) as u64,
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchwork_core::domain::item::TaskType;

    fn task(name: &str, task_type: TaskType, max_score: f64) -> TaskItem {
        TaskItem {
            name: name.to_string(),
            task_type,
            description: String::new(),
            max_score,
            requirements: vec![],
            expected_output: Map::new(),
        }
    }

    #[test]
    fn test_statistics_before_load_fails() {
        let bench = MlTaskBenchmark::new();
        assert!(matches!(
            bench.statistics(),
            Err(BenchworkError::NotLoaded { .. })
        ));
    }

    #[test]
    fn test_empty_task_list_counts_as_not_loaded() {
        let mut bench = MlTaskBenchmark::new();
        bench.data = Some(TaskDataset::default());
        assert!(matches!(
            bench.loaded_data(),
            Err(BenchworkError::NotLoaded { .. })
        ));
    }

    #[test]
    fn test_statistics_summarises_dataset() {
        let mut bench = MlTaskBenchmark::new();
        let mut datasets = Map::new();
        datasets.insert("sales".to_string(), json!({"rows": 100}));
        let mut metrics = Map::new();
        metrics.insert("accuracy".to_string(), json!("fraction correct"));

        bench.data = Some(TaskDataset {
            tasks: vec![
                task("clean", TaskType::DataPreprocessing, 100.0),
                task("train", TaskType::ModelTraining, 50.0),
                task("train harder", TaskType::ModelTraining, 50.0),
            ],
            datasets,
            evaluation_metrics: metrics,
        });

        let stats = bench.statistics().expect("statistics");
        assert_eq!(stats.total_tasks, 3);
        assert_eq!(stats.task_type_counts.get("model_training"), Some(&2));
        assert!((stats.total_max_score - 200.0).abs() < 1e-9);
        assert_eq!(stats.dataset_names, vec!["sales".to_string()]);
        assert_eq!(stats.metric_names, vec!["accuracy".to_string()]);
    }

    #[test]
    fn test_sample_items_empty_before_load() {
        let bench = MlTaskBenchmark::new();
        assert!(bench.sample_items(5).is_empty());
    }
}
