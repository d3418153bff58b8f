//! Numeric word-problem benchmark (exact-match family).
//!
//! The subject sees each question verbatim; its response goes through the
//! exact-match extraction cascade and tolerance check. Scores are binary
//! with a per-item maximum of 1.

use std::num::NonZeroUsize;
use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::info;
use uuid::Uuid;

use benchwork_core::domain::digest::DatasetDigest;
use benchwork_core::domain::error::BenchworkError;
use benchwork_core::domain::item::MathItem;
use benchwork_core::domain::outcome::ItemOutcome;
use benchwork_core::domain::report::BenchmarkReport;
use benchwork_core::domain::Result;
use benchwork_core::obs;
use benchwork_core::scorers::exact;

use crate::accum::RunAccumulator;
use crate::benchmark::{parse_dataset, read_dataset, Benchmark, EvalOptions};
use crate::subject::TextSubject;

/// Stable name recorded in reports.
pub const BENCHMARK_NAME: &str = "mathword";

/// Free-form numeric word problems scored by exact numeric match.
#[derive(Debug, Default)]
pub struct MathWordBenchmark {
    items: Vec<MathItem>,
    dataset_digest: Option<DatasetDigest>,
}

/// Dataset statistics for the numeric word-problem family.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MathWordStats {
    pub total_items: usize,
    pub avg_question_words: f64,
    pub min_question_words: usize,
    pub max_question_words: usize,
}

impl MathWordBenchmark {
    pub fn new() -> Self {
        Self::default()
    }

    /// First `min(n, len)` items, for inspection.
    pub fn sample_items(&self, n: usize) -> &[MathItem] {
        &self.items[..n.min(self.items.len())]
    }

    /// Statistics over the loaded dataset.
    pub fn statistics(&self) -> Result<MathWordStats> {
        let items = self.loaded_items()?;
        let word_counts: Vec<usize> = items
            .iter()
            .map(|item| item.question.split_whitespace().count())
            .collect();

        Ok(MathWordStats {
            total_items: items.len(),
            avg_question_words: word_counts.iter().sum::<usize>() as f64
                / word_counts.len() as f64,
            min_question_words: word_counts.iter().copied().min().unwrap_or(0),
            max_question_words: word_counts.iter().copied().max().unwrap_or(0),
        })
    }

    fn loaded_items(&self) -> Result<&[MathItem]> {
        if self.items.is_empty() {
            return Err(BenchworkError::NotLoaded {
                benchmark: BENCHMARK_NAME.to_string(),
            });
        }
        Ok(&self.items)
    }
}

#[async_trait]
impl Benchmark for MathWordBenchmark {
    type Subject = dyn TextSubject;

    fn name(&self) -> &str {
        BENCHMARK_NAME
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let raw = read_dataset(path)?;
        let items: Vec<MathItem> = parse_dataset(path, &raw)?;
        let digest = DatasetDigest::from_bytes(raw.as_bytes());

        info!(
            benchmark = BENCHMARK_NAME,
            items = items.len(),
            digest = %digest.short(),
            "dataset loaded"
        );

        self.items = items;
        self.dataset_digest = Some(digest);
        Ok(())
    }

    async fn evaluate(
        &self,
        subject: &dyn TextSubject,
        opts: &EvalOptions,
    ) -> Result<BenchmarkReport> {
        let items = self.loaded_items()?;
        let count = opts.effective_items(items.len());

        let run_id = Uuid::new_v4().to_string();
        obs::emit_eval_started(&run_id, BENCHMARK_NAME, subject.name(), count);

        let mut accum = RunAccumulator::start(BENCHMARK_NAME, subject.name());

        for (item_id, item) in items[..count].iter().enumerate() {
            match subject.generate(&item.question, &opts.params).await {
                Ok(response) => {
                    let predicted = exact::extract_numeric_answer(&response);
                    let correct = exact::check_numeric_answer(&predicted, &item.answer);
                    let score = if correct { 1.0 } else { 0.0 };

                    obs::emit_item_scored(&run_id, item_id, score, correct);
                    accum.record(ItemOutcome {
                        item_id,
                        raw_output: Value::String(response),
                        extracted: Value::String(predicted),
                        score,
                        max_score: 1.0,
                        correct,
                        notes: format!("expected {}", item.answer),
                        error: None,
                    });
                }
                Err(e) => {
                    let err = BenchworkError::SubjectInvocation {
                        item_id,
                        message: e.to_string(),
                    };
                    obs::emit_item_failed(&run_id, item_id, &err);
                    accum.record(ItemOutcome::failed(item_id, 1.0, err.to_string()));
                }
            }
        }

        let mut metadata = Map::new();
        metadata.insert(
            "max_items".to_string(),
            json!(opts.max_items.map(NonZeroUsize::get)),
        );
        metadata.insert("subject_params".to_string(), opts.params.clone());
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

    #[test]
    fn test_statistics_before_load_fails() {
        let bench = MathWordBenchmark::new();
        assert!(matches!(
            bench.statistics(),
            Err(BenchworkError::NotLoaded { .. })
        ));
    }

    #[test]
    fn test_sample_items_bounded() {
        let mut bench = MathWordBenchmark::new();
        bench.items = vec![
            MathItem {
                question: "What is 1+1?".to_string(),
                answer: "2".to_string(),
            },
            MathItem {
                question: "What is 2+2?".to_string(),
                answer: "4".to_string(),
            },
        ];
        assert_eq!(bench.sample_items(1).len(), 1);
        assert_eq!(bench.sample_items(10).len(), 2);
    }

    #[test]
    fn test_statistics_word_counts() {
        let mut bench = MathWordBenchmark::new();
        bench.items = vec![
            MathItem {
                question: "one two three".to_string(),
                answer: "3".to_string(),
            },
            MathItem {
                question: "one".to_string(),
                answer: "1".to_string(),
            },
        ];
        let stats = bench.statistics().expect("statistics");
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.min_question_words, 1);
        assert_eq!(stats.max_question_words, 3);
        assert!((stats.avg_question_words - 2.0).abs() < 1e-12);
    }
}
