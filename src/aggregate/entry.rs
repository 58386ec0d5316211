//! Leaderboard entry derivation
//!
//! An entry is the ranked view of one stored record: identity fields, the
//! quality metric (passrate), the speed metric (API generation duration),
//! and evidence pointers. UI duration is tracked separately and never merged
//! into the ranked duration.

use std::path::Path;

use serde::Serialize;

use crate::record::{ApiStyle, ResultDocument, TargetModel};

/// One ranked leaderboard entry.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub tool_name: String,
    pub tool_version: String,
    pub run_id: String,
    pub target_model: TargetModel,
    pub api_style: ApiStyle,
    pub run_number: u8,
    pub spec_reference: String,
    /// Fraction of acceptance tests passed, in [0, 1]
    pub passrate: f64,
    /// API generation duration in minutes
    pub duration_minutes: f64,
    /// UI generation duration, reported separately when a UI run exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_duration_minutes: Option<f64>,
    /// Filled in by the composite policy over the full entry set
    pub composite_score: f64,
    pub llm_model: String,
    pub submitted_timestamp: String,
    pub submitted_by: String,
    /// Evidence pointer back to the stored record
    pub source_path: String,
}

/// Why a readable record was excluded from the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The record has no API implementation to rank
    NoApiImplementation,
    /// No passrate was reported and none is derivable from the counts
    NoPassrate,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoApiImplementation => write!(f, "no api implementation"),
            SkipReason::NoPassrate => {
                write!(f, "no passrate reported and none derivable from counts")
            }
        }
    }
}

/// Derives the leaderboard entry for one stored record.
///
/// The passrate comes from the acceptance block, falling back to
/// `pass_count / (pass_count + fail_count)` when the explicit rate is
/// absent. `composite_score` starts at zero; the composite policy fills it
/// in once the full entry set is known.
pub fn derive_entry(
    document: &ResultDocument,
    path: &Path,
) -> Result<LeaderboardEntry, SkipReason> {
    let api = document
        .result_data
        .implementations
        .api
        .as_ref()
        .ok_or(SkipReason::NoApiImplementation)?;

    let passrate = api
        .acceptance
        .effective_passrate()
        .ok_or(SkipReason::NoPassrate)?;

    let identity = &document.result_data.run_identity;
    let submission = &document.result_data.submission;
    let ui_duration_minutes = document
        .result_data
        .implementations
        .ui
        .as_ref()
        .map(|ui| ui.generation_metrics.duration_minutes);

    Ok(LeaderboardEntry {
        tool_name: identity.tool_name.clone(),
        tool_version: identity.tool_version.clone(),
        run_id: identity.run_id.clone(),
        target_model: identity.target_model,
        api_style: identity.api_style,
        run_number: identity.run_number,
        spec_reference: identity.spec_reference.clone(),
        passrate,
        duration_minutes: api.generation_metrics.duration_minutes,
        ui_duration_minutes,
        composite_score: 0.0,
        llm_model: api.generation_metrics.llm_model.clone(),
        submitted_timestamp: submission.submitted_timestamp.clone(),
        submitted_by: submission.submitted_by.clone(),
        source_path: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn document(api: Option<serde_json::Value>, ui: Option<serde_json::Value>) -> ResultDocument {
        let mut implementations = serde_json::Map::new();
        if let Some(api) = api {
            implementations.insert("api".into(), api);
        }
        if let Some(ui) = ui {
            implementations.insert("ui".into(), ui);
        }
        serde_json::from_value(json!({
            "schema_version": "3.0",
            "result_data": {
                "run_identity": {
                    "tool_name": "forge",
                    "tool_version": "1.2.0",
                    "run_id": "forge-a-rest-1",
                    "run_number": 1,
                    "target_model": "A",
                    "api_style": "REST",
                    "spec_reference": "spec-v1",
                    "workspace_path": "/tmp/ws",
                    "run_environment": "ci"
                },
                "implementations": implementations,
                "submission": {
                    "submitted_timestamp": "2025-01-15T11:00:00Z",
                    "submitted_by": "alice",
                    "submission_method": "automated"
                }
            }
        }))
        .unwrap()
    }

    fn api_block(passrate: Option<f64>, pass: u32, fail: u32) -> serde_json::Value {
        let mut acceptance = json!({
            "pass_count": pass,
            "fail_count": fail,
            "not_run_count": 0
        });
        if let Some(rate) = passrate {
            acceptance["passrate"] = json!(rate);
        }
        json!({
            "generation_metrics": {
                "llm_model": "model-x",
                "start_timestamp": "2025-01-15T10:00:00Z",
                "end_timestamp": "2025-01-15T10:42:00Z",
                "duration_minutes": 42.0,
                "clarifications_count": 0,
                "interventions_count": 0,
                "reruns_count": 0
            },
            "acceptance": acceptance,
            "artifacts": {
                "contract_artifact_path": "artifacts/contract.yaml",
                "run_instructions_path": "artifacts/RUN.md"
            }
        })
    }

    fn ui_block(duration: f64) -> serde_json::Value {
        json!({
            "generation_metrics": {
                "llm_model": "model-x",
                "start_timestamp": "2025-01-15T10:00:00Z",
                "end_timestamp": "2025-01-15T10:30:00Z",
                "duration_minutes": duration,
                "clarifications_count": 0,
                "interventions_count": 0,
                "reruns_count": 0
            },
            "build_success": true,
            "artifacts": {
                "ui_source_path": "ui/src",
                "ui_run_summary_path": "ui/SUMMARY.md"
            }
        })
    }

    #[test]
    fn test_entry_uses_explicit_passrate() {
        let doc = document(Some(api_block(Some(0.9), 9, 1)), None);
        let entry = derive_entry(&doc, &PathBuf::from("a.json")).unwrap();
        assert_eq!(entry.passrate, 0.9);
        assert_eq!(entry.duration_minutes, 42.0);
        assert!(entry.ui_duration_minutes.is_none());
    }

    #[test]
    fn test_entry_falls_back_to_counts() {
        let doc = document(Some(api_block(None, 3, 1)), None);
        let entry = derive_entry(&doc, &PathBuf::from("a.json")).unwrap();
        assert_eq!(entry.passrate, 0.75);
    }

    #[test]
    fn test_ui_duration_kept_separate() {
        let doc = document(Some(api_block(Some(0.9), 9, 1)), Some(ui_block(30.0)));
        let entry = derive_entry(&doc, &PathBuf::from("a.json")).unwrap();
        assert_eq!(entry.duration_minutes, 42.0);
        assert_eq!(entry.ui_duration_minutes, Some(30.0));
    }

    #[test]
    fn test_ui_only_record_skipped() {
        let doc = document(None, Some(ui_block(30.0)));
        let skipped = derive_entry(&doc, &PathBuf::from("a.json")).unwrap_err();
        assert_eq!(skipped, SkipReason::NoApiImplementation);
    }

    #[test]
    fn test_record_without_derivable_passrate_skipped() {
        let doc = document(Some(api_block(None, 0, 0)), None);
        let skipped = derive_entry(&doc, &PathBuf::from("a.json")).unwrap_err();
        assert_eq!(skipped, SkipReason::NoPassrate);
    }
}
