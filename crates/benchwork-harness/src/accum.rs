//! Run accumulation: folds per-item outcomes into a report.

use std::time::Instant;

use chrono::Utc;
use serde_json::{Map, Value};

use benchwork_core::domain::outcome::ItemOutcome;
use benchwork_core::domain::report::BenchmarkReport;

/// Accumulates outcomes for one `evaluate` call and produces the
/// [`BenchmarkReport`] in one shot.
///
/// Each call to `evaluate` owns its accumulator privately; interim state
/// is never exposed. Wall-clock time runs from construction to `finish`,
/// around the whole loop rather than per item.
#[derive(Debug)]
pub struct RunAccumulator {
    benchmark_name: String,
    subject_name: String,
    outcomes: Vec<ItemOutcome>,
    correct_count: usize,
    started: Instant,
}

impl RunAccumulator {
    /// Start accumulating for a run.
    pub fn start(benchmark_name: impl Into<String>, subject_name: impl Into<String>) -> Self {
        Self {
            benchmark_name: benchmark_name.into(),
            subject_name: subject_name.into(),
            outcomes: Vec::new(),
            correct_count: 0,
            started: Instant::now(),
        }
    }

    /// Record one item outcome, in dataset order.
    pub fn record(&mut self, outcome: ItemOutcome) {
        if outcome.correct {
            self.correct_count += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Outcomes recorded so far.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no outcome has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Correct items recorded so far.
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// Produce the final report.
    ///
    /// Consumes the accumulator; a report is constructed exactly once
    /// per run and owns its outcomes exclusively.
    pub fn finish(self, metadata: Map<String, Value>) -> BenchmarkReport {
        let total_items = self.outcomes.len();
        let accuracy = if total_items == 0 {
            0.0
        } else {
            self.correct_count as f64 / total_items as f64
        };

        BenchmarkReport {
            benchmark_name: self.benchmark_name,
            subject_name: self.subject_name,
            total_items,
            correct_count: self.correct_count,
            accuracy,
            execution_time: self.started.elapsed().as_secs_f64(),
            timestamp: Utc::now().to_rfc3339(),
            detailed_results: self.outcomes,
            metadata,
        }
    }
}
