//! Structured observability hooks for evaluation runs.
//!
//! Emission functions for the evaluation lifecycle: start, per-item
//! scoring, per-item subject failure, finish. Every event carries the
//! run id so one run's lines correlate in aggregated logs; the functions
//! never affect scoring.
//!
//! Events are emitted at `info!` level; per-item subject failures are
//! warnings.

use tracing::{info, warn};

/// Emit event: evaluation started.
pub fn emit_eval_started(run_id: &str, benchmark: &str, subject: &str, total_items: usize) {
    info!(
        event = "eval.started",
        run_id = %run_id,
        benchmark = %benchmark,
        subject = %subject,
        total_items = total_items,
    );
}

/// Emit event: one item scored.
pub fn emit_item_scored(run_id: &str, item_id: usize, score: f64, correct: bool) {
    info!(
        event = "eval.item_scored",
        run_id = %run_id,
        item_id = item_id,
        score = score,
        correct = correct,
    );
}

/// Emit event: the subject failed on one item (recovered, loop continues).
pub fn emit_item_failed(run_id: &str, item_id: usize, error: &dyn std::fmt::Display) {
    warn!(event = "eval.item_failed", run_id = %run_id, item_id = item_id, error = %error);
}

/// Emit event: evaluation finished with aggregate results.
pub fn emit_eval_finished(
    run_id: &str,
    total_items: usize,
    correct_count: usize,
    accuracy: f64,
    duration_ms: u64,
) {
    info!(
        event = "eval.finished",
        run_id = %run_id,
        total_items = total_items,
        correct_count = correct_count,
        accuracy = accuracy,
        duration_ms = duration_ms,
    );
}
