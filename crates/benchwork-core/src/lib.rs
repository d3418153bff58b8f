//! Benchwork Core Library
//!
//! Domain model, scoring strategies, and result artifacts for the
//! Benchwork evaluation harness.

pub mod artifact;
pub mod domain;
pub mod obs;
pub mod scorers;
pub mod telemetry;

pub use domain::{
    BenchmarkReport, BenchworkError, DatasetDigest, ItemOutcome, MathItem, ProductItem, Result,
    TaskDataset, TaskItem, TaskType,
};

pub use artifact::{load_report, render_report_md, save_report, write_report_md};

pub use scorers::exact::{check_numeric_answer, extract_numeric_answer, NUMERIC_TOLERANCE};
pub use scorers::overlap::{
    assemble_context, check_overlap_answer, extract_answer_line, ConfusionCounts,
};
pub use scorers::rubric::{
    bucket_for_score, evaluation_notes, score_task_result, CompletionBucket, CompletionTally,
};

pub use telemetry::init_tracing;

/// Benchwork version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
