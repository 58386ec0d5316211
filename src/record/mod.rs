//! Typed result-document model for benchboard
//!
//! The canonical shape of one benchmark run submission after it has passed
//! schema validation. The store persists these documents verbatim; the
//! aggregation engine reads them back and derives leaderboard entries.
//!
//! # Design Principles
//!
//! - One document per run, keyed by `run_identity.run_id`
//! - Immutable after validation, except for appended pipeline metadata
//! - Optional fields stay absent on the wire (`skip_serializing_if`)

mod document;
mod metrics;

pub use document::{
    AggregationMetadata, ApiStyle, GithubIssueRef, Processing, ResultData, ResultDocument,
    RunIdentity, StorageMetadata, StorageStatus, Submission, SubmissionMethod, TargetModel,
    ValidationMetadata, ValidationStatus,
};
pub use metrics::{
    Acceptance, ApiArtifacts, ApiImplementation, GenerationMetrics, Implementations, LlmUsage,
    QualityMetrics, TestRun, UiArtifacts, UiImplementation, UsageSource,
};
