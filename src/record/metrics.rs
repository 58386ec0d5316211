//! Implementation blocks and measured metrics
//!
//! A submission reports an `api` implementation, a `ui` implementation, or
//! both; at least one must be present. Each carries its own generation
//! metrics and evidence. API runs carry acceptance-test results; UI runs
//! carry a build-success flag.

use serde::{Deserialize, Serialize};

/// The `api` / `ui` implementation pair. At least one must be present;
/// validation enforces this before a document reaches this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Implementations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiImplementation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiImplementation>,
}

impl Implementations {
    /// Returns whether at least one implementation block is present.
    pub fn has_any(&self) -> bool {
        self.api.is_some() || self.ui.is_some()
    }
}

/// Measured results of the API implementation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiImplementation {
    pub generation_metrics: GenerationMetrics,
    pub acceptance: Acceptance,
    pub artifacts: ApiArtifacts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_metrics: Option<QualityMetrics>,
}

/// Measured results of the UI implementation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiImplementation {
    pub generation_metrics: GenerationMetrics,
    /// Whether the generated UI builds and runs
    pub build_success: bool,
    pub artifacts: UiArtifacts,
}

/// Generation-time metrics shared by API and UI implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetrics {
    pub llm_model: String,
    pub start_timestamp: String,
    pub end_timestamp: String,
    pub duration_minutes: f64,
    pub clarifications_count: u32,
    pub interventions_count: u32,
    pub reruns_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_iterations_count: Option<u32>,
    /// UI runs only: whether backend changes were required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_changes_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_runs: Vec<TestRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_usage: Option<LlmUsage>,
}

/// One intermediate test execution during generation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TestRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tests: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed: Option<u32>,
}

/// Acceptance-test results for the API implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acceptance {
    pub pass_count: u32,
    pub fail_count: u32,
    pub not_run_count: u32,
    /// Explicit pass rate in [0, 1]; derivable from the counts when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passrate: Option<f64>,
}

impl Acceptance {
    /// The pass rate to rank by: the explicit rate when reported, otherwise
    /// `pass_count / (pass_count + fail_count)`. Returns `None` when no rate
    /// is reported and no tests ran to completion.
    pub fn effective_passrate(&self) -> Option<f64> {
        if let Some(rate) = self.passrate {
            return Some(rate);
        }
        let finished = self.pass_count + self.fail_count;
        if finished == 0 {
            return None;
        }
        Some(f64::from(self.pass_count) / f64::from(finished))
    }
}

/// Evidence paths for the API implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiArtifacts {
    pub contract_artifact_path: String,
    pub run_instructions_path: String,
}

/// Evidence paths for the UI implementation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiArtifacts {
    pub ui_source_path: String,
    pub ui_run_summary_path: String,
}

/// Operator-assessed quality metrics for the API implementation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QualityMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub determinism_compliance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overreach_incidents_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_completeness_passrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions_quality_rating: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reproducibility_rating: Option<String>,
}

/// Token and cost accounting for the generation run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_source: Option<UsageSource>,
}

/// Where the usage numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageSource {
    ToolReported,
    OperatorEstimated,
    Unknown,
}
