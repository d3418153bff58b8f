//! Overlap scoring for the context-grounded product QA family.
//!
//! The scorer owns two deterministic text transforms (context assembly
//! and answer-line extraction), the bidirectional containment check,
//! and the run-level confusion-count bookkeeping that precision, recall,
//! and F1 are derived from.

use serde::{Deserialize, Serialize};

use crate::domain::item::ProductItem;

/// Prompt-structure markers that answer extraction skips over.
const STRUCTURAL_MARKERS: &[&str] = &["Question:", "Product:", "Answer:", "Context:"];

/// Maximum number of review strings included in the assembled context.
pub const MAX_CONTEXT_REVIEWS: usize = 3;

/// Assemble the grounding context for a product.
///
/// Fields appear in fixed order (title, description, specifications,
/// price, category, reviews) with empty fields omitted. Specification
/// pairs are comma-joined in `BTreeMap` key order and at most
/// [`MAX_CONTEXT_REVIEWS`] reviews are included, so the result is stable
/// across runs for the same item.
pub fn assemble_context(product: &ProductItem) -> String {
    let mut parts = Vec::new();

    if !product.title.is_empty() {
        parts.push(format!("Title: {}", product.title));
    }
    if !product.description.is_empty() {
        parts.push(format!("Description: {}", product.description));
    }
    if !product.specifications.is_empty() {
        let specs = product
            .specifications
            .iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Specifications: {specs}"));
    }
    if !product.price.is_empty() {
        parts.push(format!("Price: {}", product.price));
    }
    if !product.category.is_empty() {
        parts.push(format!("Category: {}", product.category));
    }
    if !product.reviews.is_empty() {
        let reviews = product
            .reviews
            .iter()
            .take(MAX_CONTEXT_REVIEWS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        parts.push(format!("Reviews: {reviews}"));
    }

    parts.join("\n")
}

/// Extract the answer line from a subject response.
///
/// Returns the last non-empty line that is not a restatement of a prompt
/// structural marker; when every line is empty or structural, returns the
/// full trimmed response.
pub fn extract_answer_line(response: &str) -> String {
    for line in response.trim().lines().rev() {
        let line = line.trim();
        if !line.is_empty()
            && !STRUCTURAL_MARKERS
                .iter()
                .any(|marker| line.starts_with(marker))
        {
            return line.to_string();
        }
    }

    response.trim().to_string()
}

/// Bidirectional containment check, case-insensitive and trimmed.
///
/// Correct when either side contains the other. Deliberately permissive:
/// a short expected answer ("Yes") contained in a longer prediction
/// ("Yes, but...") counts as correct.
pub fn check_overlap_answer(predicted: &str, expected: &str) -> bool {
    let predicted = predicted.trim().to_lowercase();
    let expected = expected.trim().to_lowercase();

    predicted == expected || predicted.contains(&expected) || expected.contains(&predicted)
}

/// Confusion-count bookkeeping across one evaluation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    /// Record one item.
    ///
    /// A correct item counts as a true positive. An incorrect item counts
    /// as a false negative, and additionally as a false positive when the
    /// subject produced a non-empty prediction.
    pub fn record(&mut self, correct: bool, predicted: &str) {
        if correct {
            self.true_positives += 1;
        } else {
            self.false_negatives += 1;
            if !predicted.trim().is_empty() {
                self.false_positives += 1;
            }
        }
    }

    /// `TP / (TP + FP)`, or 0 when the denominator is 0.
    pub fn precision(&self) -> f64 {
        let denominator = self.true_positives + self.false_positives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// `TP / (TP + FN)`, or 0 when the denominator is 0.
    pub fn recall(&self) -> f64 {
        let denominator = self.true_positives + self.false_negatives;
        if denominator == 0 {
            0.0
        } else {
            self.true_positives as f64 / denominator as f64
        }
    }

    /// Harmonic mean of precision and recall, or 0 when both are 0.
    pub fn f1(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }
}
