//! Top-level result document structure
//!
//! A document carries:
//! - `run_identity`: who ran what, against which configuration
//! - `implementations`: measured API and/or UI implementation results
//! - `submission`: who submitted it, how, and when
//! - pipeline-appended metadata (processing, storage, validation, aggregation)
//!
//! `run_identity.run_id` is the global identity key: the store keeps exactly
//! one document per run_id at any time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metrics::Implementations;

/// One benchmark run submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Declared schema version ("2.0" or "3.0")
    pub schema_version: String,
    /// The submitted result payload
    pub result_data: ResultData,
}

impl ResultDocument {
    /// Returns the global identity key for this document.
    pub fn run_id(&self) -> &str {
        &self.result_data.run_identity.run_id
    }

    /// Returns the canonical submission timestamp used for partitioning.
    pub fn submitted_timestamp(&self) -> &str {
        &self.result_data.submission.submitted_timestamp
    }
}

/// The result payload under `result_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultData {
    pub run_identity: RunIdentity,
    pub implementations: Implementations,
    pub submission: Submission,
    /// Appended by the pipeline at ingest time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<Processing>,
    /// Appended by the store at write time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_metadata: Option<StorageMetadata>,
    /// Appended by the validator audit step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_metadata: Option<ValidationMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_metadata: Option<AggregationMetadata>,
}

/// Identity of one benchmark run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunIdentity {
    pub tool_name: String,
    pub tool_version: String,
    /// Globally unique run identifier; the store's dedup key
    pub run_id: String,
    /// 1 or 2
    pub run_number: u8,
    pub target_model: TargetModel,
    pub api_style: ApiStyle,
    pub spec_reference: String,
    pub workspace_path: String,
    pub run_environment: String,
}

/// Benchmark target model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TargetModel {
    A,
    B,
}

impl TargetModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetModel::A => "A",
            TargetModel::B => "B",
        }
    }
}

impl std::fmt::Display for TargetModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API style the run targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApiStyle {
    #[serde(rename = "REST")]
    Rest,
    #[serde(rename = "GraphQL")]
    GraphQl,
}

impl ApiStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiStyle::Rest => "REST",
            ApiStyle::GraphQl => "GraphQL",
        }
    }
}

impl std::fmt::Display for ApiStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Submission context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// ISO-8601 UTC; selects the storage partition
    pub submitted_timestamp: String,
    pub submitted_by: String,
    pub submission_method: SubmissionMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_issue: Option<GithubIssueRef>,
}

/// How the submission reached the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionMethod {
    Automated,
    Manual,
}

/// Pointer back to the originating issue, when one exists.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GithubIssueRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_closed_at: Option<String>,
}

/// Pipeline processing status, appended at ingest time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Processing {
    /// Unique id for this trip through the pipeline
    pub ingest_id: Uuid,
    pub validation_status: ValidationStatus,
    pub storage_status: StorageStatus,
    pub ingested_timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_timestamp: Option<String>,
}

/// Validation status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Pending,
    Valid,
    Invalid,
    Error,
}

/// Storage status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageStatus {
    Pending,
    Stored,
    Failed,
    DuplicateReplaced,
}

impl StorageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageStatus::Pending => "pending",
            StorageStatus::Stored => "stored",
            StorageStatus::Failed => "failed",
            StorageStatus::DuplicateReplaced => "duplicate_replaced",
        }
    }
}

/// Where and when the record was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageMetadata {
    pub stored_at: String,
    pub partition_year: i32,
    /// 1..=12
    pub partition_month: u32,
    pub relative_path: String,
}

/// Audit trail of the validation step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationMetadata {
    pub validated_at: String,
    pub validator_version: String,
    pub error_count: usize,
}

/// Aggregation bookkeeping. Never written back to stored records; present
/// only so that documents carrying it from an earlier system still parse.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AggregationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_aggregated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_export_timestamp: Option<String>,
}
