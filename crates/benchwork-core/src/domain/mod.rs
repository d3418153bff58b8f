//! Domain models for Benchwork.
//!
//! Canonical definitions for the core entities:
//! - Dataset items for the three task families
//! - `ItemOutcome`: the per-item record of what was asked, produced, and scored
//! - `BenchmarkReport`: the immutable result of one evaluation run

pub mod digest;
pub mod error;
pub mod item;
pub mod outcome;
pub mod report;

// Re-export main types and errors
pub use digest::DatasetDigest;
pub use error::{BenchworkError, Result};
pub use item::{MathItem, ProductItem, TaskDataset, TaskItem, TaskType};
pub use outcome::ItemOutcome;
pub use report::BenchmarkReport;
