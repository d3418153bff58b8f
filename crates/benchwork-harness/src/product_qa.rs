//! Grounded product question-answering benchmark (overlap/F1 family).
//!
//! Each item's product record is assembled into a deterministic context
//! block; the subject answers the question against that context. The
//! extracted answer line is checked by bidirectional containment, and
//! confusion counts accumulated across the run yield precision, recall,
//! and F1 in the report metadata.

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
use benchwork_core::domain::item::ProductItem;
use benchwork_core::domain::outcome::ItemOutcome;
use benchwork_core::domain::report::BenchmarkReport;
use benchwork_core::domain::Result;
use benchwork_core::obs;
use benchwork_core::scorers::overlap::{
    assemble_context, check_overlap_answer, extract_answer_line, ConfusionCounts,
};

use crate::accum::RunAccumulator;
use crate::benchmark::{parse_dataset, read_dataset, Benchmark, EvalOptions};
use crate::subject::TextSubject;

/// Stable name recorded in reports.
pub const BENCHMARK_NAME: &str = "product_qa";

/// Context excerpt length kept in per-item notes.
const NOTE_CONTEXT_CHARS: usize = 200;

/// Grounded product questions scored by answer overlap.
#[derive(Debug, Default)]
pub struct ProductQaBenchmark {
    items: Vec<ProductItem>,
    dataset_digest: Option<DatasetDigest>,
}

/// Dataset statistics for the product QA family.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductQaStats {
    pub total_items: usize,
    pub avg_question_words: f64,
    pub avg_context_words: f64,
    pub categories: BTreeMap<String, usize>,
}

impl ProductQaBenchmark {
    pub fn new() -> Self {
        Self::default()
    }

    /// First `min(n, len)` items, for inspection.
    pub fn sample_items(&self, n: usize) -> &[ProductItem] {
        &self.items[..n.min(self.items.len())]
    }

    /// Statistics over the loaded dataset.
    pub fn statistics(&self) -> Result<ProductQaStats> {
        let items = self.loaded_items()?;

        let question_words: usize = items
            .iter()
            .map(|item| item.question.split_whitespace().count())
            .sum();
        let context_words: usize = items
            .iter()
            .map(|item| assemble_context(item).split_whitespace().count())
            .sum();

        let mut categories = BTreeMap::new();
        for item in items {
            let category = if item.category.is_empty() {
                "Unknown".to_string()
            } else {
                item.category.clone()
            };
            *categories.entry(category).or_insert(0) += 1;
        }

        Ok(ProductQaStats {
            total_items: items.len(),
            avg_question_words: question_words as f64 / items.len() as f64,
            avg_context_words: context_words as f64 / items.len() as f64,
            categories,
        })
    }

    fn loaded_items(&self) -> Result<&[ProductItem]> {
        if self.items.is_empty() {
            return Err(BenchworkError::NotLoaded {
                benchmark: BENCHMARK_NAME.to_string(),
            });
        }
        Ok(&self.items)
    }
}

/// Keep a bounded excerpt of the context for per-item notes.
fn context_excerpt(context: &str) -> String {
    if context.chars().count() <= NOTE_CONTEXT_CHARS {
        context.to_string()
    } else {
        let head: String = context.chars().take(NOTE_CONTEXT_CHARS).collect();
        format!("{head}...")
    }
}

#[async_trait]
impl Benchmark for ProductQaBenchmark {
    type Subject = dyn TextSubject;

    fn name(&self) -> &str {
        BENCHMARK_NAME
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let raw = read_dataset(path)?;
        let items: Vec<ProductItem> = parse_dataset(path, &raw)?;
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
        let mut counts = ConfusionCounts::default();

        for (item_id, item) in items[..count].iter().enumerate() {
            let context = assemble_context(item);
            let prompt = format!(
                "Product: {context}\n\nQuestion: {}\n\nAnswer:",
                item.question
            );

            match subject.generate(&prompt, &opts.params).await {
                Ok(response) => {
                    let predicted = extract_answer_line(&response);
                    let correct = check_overlap_answer(&predicted, &item.answer);
                    counts.record(correct, &predicted);
                    let score = if correct { 1.0 } else { 0.0 };

                    obs::emit_item_scored(&run_id, item_id, score, correct);
                    accum.record(ItemOutcome {
                        item_id,
                        raw_output: Value::String(response),
                        extracted: Value::String(predicted),
                        score,
                        max_score: 1.0,
                        correct,
                        notes: format!(
                            "expected: {}; context: {}",
                            item.answer,
                            context_excerpt(&context)
                        ),
                        error: None,
                    });
                }
                Err(e) => {
                    // A failed invocation is a miss with no prediction.
                    counts.record(false, "");
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
        metadata.insert("precision".to_string(), json!(counts.precision()));
        metadata.insert("recall".to_string(), json!(counts.recall()));
        metadata.insert("f1_score".to_string(), json!(counts.f1()));
        metadata.insert("true_positives".to_string(), json!(counts.true_positives));
        metadata.insert(
            "false_positives".to_string(),
            json!(counts.false_positives),
        );
        metadata.insert(
            "false_negatives".to_string(),
            json!(counts.false_negatives),
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

    #[test]
    fn test_context_excerpt_short_passthrough() {
        assert_eq!(context_excerpt("Title: Kettle"), "Title: Kettle");
    }

    #[test]
    fn test_context_excerpt_truncates() {
        let long = "x".repeat(500);
        let excerpt = context_excerpt(&long);
        assert_eq!(excerpt.chars().count(), NOTE_CONTEXT_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_statistics_before_load_fails() {
        let bench = ProductQaBenchmark::new();
        assert!(matches!(
            bench.statistics(),
            Err(BenchworkError::NotLoaded { .. })
        ));
    }

    #[test]
    fn test_statistics_counts_categories() {
        let mut bench = ProductQaBenchmark::new();
        let base = ProductItem {
            product_id: String::new(),
            title: "Widget".to_string(),
            description: String::new(),
            specifications: BTreeMap::new(),
            reviews: vec![],
            price: String::new(),
            category: "Tools".to_string(),
            question: "what is it".to_string(),
            answer: "a widget".to_string(),
        };
        let mut uncategorised = base.clone();
        uncategorised.category.clear();
        bench.items = vec![base.clone(), base, uncategorised];

        let stats = bench.statistics().expect("statistics");
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.categories.get("Tools"), Some(&2));
        assert_eq!(stats.categories.get("Unknown"), Some(&1));
    }
}
