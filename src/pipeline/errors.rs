//! Pipeline error types
//!
//! Expected submission failures (parse, validation, storage) are not errors
//! of this type: they travel inside the `SubmissionReport` so the notifier
//! can render them. `PipelineError` covers infrastructure failures only.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Infrastructure failures of the pipeline itself.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to write aggregate output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_converts() {
        let store_err = StoreError::read_failed_no_source("scan failed");
        let err: PipelineError = store_err.into();
        assert!(err.to_string().contains("scan failed"));
    }

    #[test]
    fn test_output_write_names_path() {
        let err = PipelineError::OutputWrite {
            path: PathBuf::from("aggregates/leaderboard.json"),
            source: StoreError::write_failed_no_source("disk full"),
        };
        assert!(err.to_string().contains("aggregates/leaderboard.json"));
    }
}
