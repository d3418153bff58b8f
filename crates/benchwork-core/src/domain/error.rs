//! Domain-level error taxonomy for Benchwork.

use std::path::PathBuf;

/// Benchwork domain errors.
///
/// `DatasetNotFound`, `DatasetMalformed`, and `NotLoaded` are fatal to the
/// call that produced them. `SubjectInvocation` is recovered inside the
/// evaluation loop: the failing item is recorded with a zero score and the
/// loop continues, so this variant never propagates out of `evaluate`.
#[derive(Debug, thiserror::Error)]
pub enum BenchworkError {
    #[error("dataset file not found: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("malformed dataset {path}: {reason}")]
    DatasetMalformed { path: PathBuf, reason: String },

    #[error("no dataset loaded for benchmark '{benchmark}'; call load() first")]
    NotLoaded { benchmark: String },

    #[error("subject failed on item {item_id}: {message}")]
    SubjectInvocation { item_id: usize, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Benchwork domain operations.
pub type Result<T> = std::result::Result<T, BenchworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_not_found_display() {
        let err = BenchworkError::DatasetNotFound {
            path: PathBuf::from("/data/missing.json"),
        };
        assert!(err.to_string().contains("dataset file not found"));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_dataset_malformed_display() {
        let err = BenchworkError::DatasetMalformed {
            path: PathBuf::from("bad.json"),
            reason: "expected a sequence".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bad.json"));
        assert!(msg.contains("expected a sequence"));
    }

    #[test]
    fn test_not_loaded_display() {
        let err = BenchworkError::NotLoaded {
            benchmark: "mathword".to_string(),
        };
        assert!(err.to_string().contains("mathword"));
        assert!(err.to_string().contains("call load() first"));
    }

    #[test]
    fn test_subject_invocation_display() {
        let err = BenchworkError::SubjectInvocation {
            item_id: 7,
            message: "connection reset".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("item 7"));
        assert!(msg.contains("connection reset"));
    }
}
