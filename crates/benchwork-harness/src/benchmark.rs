//! The polymorphic benchmark contract.
//!
//! Every task family implements the same capability set (`load`,
//! `evaluate`, `run`) as an independent type; `run` is a provided
//! composition rather than inherited state. The families differ only in
//! their item shape, scoring strategy, and the subject capability they
//! drive (the associated `Subject` type).

use std::num::NonZeroUsize;
use std::path::Path;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use benchwork_core::domain::error::BenchworkError;
use benchwork_core::domain::report::BenchmarkReport;
use benchwork_core::domain::Result;

/// Options for one `evaluate` call.
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// Upper bound on evaluated items (`None` = whole dataset). A zero
    /// bound is unrepresentable by construction.
    pub max_items: Option<NonZeroUsize>,

    /// Opaque parameter bag forwarded to the subject on every
    /// invocation.
    pub params: Value,
}

impl EvalOptions {
    /// Options evaluating the whole dataset with no subject parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the number of evaluated items.
    pub fn with_max_items(mut self, max_items: NonZeroUsize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    /// Forward a parameter bag to the subject.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Number of items to evaluate out of `available`.
    pub(crate) fn effective_items(&self, available: usize) -> usize {
        match self.max_items {
            Some(bound) => available.min(bound.get()),
            None => available,
        }
    }
}

/// Capability set every task family implements.
#[async_trait]
pub trait Benchmark {
    /// The subject capability this family drives.
    type Subject: ?Sized + Sync;

    /// Stable benchmark name recorded in reports.
    fn name(&self) -> &str;

    /// Load and structurally validate a dataset file, fully replacing
    /// any previously loaded state.
    ///
    /// # Errors
    ///
    /// - `DatasetNotFound`: the path does not resolve to a readable file.
    /// - `DatasetMalformed`: the file is not valid structured data for
    ///   this family.
    fn load(&mut self, path: &Path) -> Result<()>;

    /// Evaluate the subject over the loaded dataset.
    ///
    /// Items are processed strictly sequentially in dataset order; a
    /// subject error on one item is recorded in that item's outcome and
    /// the loop continues. The dataset is never mutated.
    ///
    /// # Errors
    ///
    /// - `NotLoaded`: called before a successful `load` (an empty
    ///   dataset counts as not loaded).
    async fn evaluate(
        &self,
        subject: &Self::Subject,
        opts: &EvalOptions,
    ) -> Result<BenchmarkReport>;

    /// Load then evaluate; same failure semantics as both.
    async fn run(
        &mut self,
        subject: &Self::Subject,
        path: &Path,
        opts: &EvalOptions,
    ) -> Result<BenchmarkReport> {
        self.load(path)?;
        self.evaluate(subject, opts).await
    }
}

/// Read a dataset file, mapping a missing path to `DatasetNotFound`.
pub(crate) fn read_dataset(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(BenchworkError::DatasetNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Parse raw dataset text, mapping parse failures to `DatasetMalformed`.
pub(crate) fn parse_dataset<T: DeserializeOwned>(path: &Path, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| BenchworkError::DatasetMalformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
