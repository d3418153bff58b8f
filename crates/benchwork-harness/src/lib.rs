//! Benchwork Harness Library
//!
//! The polymorphic benchmark contract and the three task-family
//! evaluation loops. Every family implements the same capability set
//! (`load`, `evaluate`, `run`) and reports through the shared
//! `BenchmarkReport` shape from `benchwork-core`.

pub mod accum;
pub mod benchmark;
pub mod mathword;
pub mod ml_tasks;
pub mod product_qa;
pub mod subject;

pub use accum::RunAccumulator;
pub use benchmark::{Benchmark, EvalOptions};
pub use mathword::{MathWordBenchmark, MathWordStats};
pub use ml_tasks::{MlTaskBenchmark, MlTaskStats};
pub use product_qa::{ProductQaBenchmark, ProductQaStats};
pub use subject::{TaskSubject, TextSubject};
