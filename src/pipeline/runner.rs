//! Pipeline runner
//!
//! `submit` drives one raw submission end to end: parse, validate, stamp
//! pipeline metadata, store under the identity key, then rebuild the entire
//! leaderboard from the full store and write `leaderboard.json` and
//! `results.csv` atomically. The returned `SubmissionReport` is the complete
//! record for the external notification channel; nothing is ever silently
//! dropped.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use serde::Serialize;

use crate::aggregate::{AggregationEngine, CompositePolicy};
use crate::observability::{log_event, Event};
use crate::record::{
    Processing, ResultDocument, StorageMetadata, StorageStatus, ValidationMetadata,
    ValidationStatus,
};
use crate::schema::{
    SchemaErrorCode, SchemaRegistry, SchemaValidator, ValidationReport,
};
use crate::store::{write_atomic, ResultStore, StorageOutcome};

use super::errors::{PipelineError, PipelineResult};
use super::state::SubmissionState;

/// File name of the structured leaderboard output.
pub const LEADERBOARD_FILE: &str = "leaderboard.json";
/// File name of the flat tabular export.
pub const CSV_FILE: &str = "results.csv";

/// Outcome summary of one full rebuild.
#[derive(Debug, Clone, Serialize)]
pub struct RebuildSummary {
    pub total_results: usize,
    pub warning_count: usize,
}

/// Complete record of one submission's trip through the pipeline, handed to
/// the external notifier.
#[derive(Debug, Serialize)]
pub struct SubmissionReport {
    pub state: SubmissionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebuild: Option<RebuildSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionReport {
    fn failed(state: SubmissionState, error: String) -> Self {
        Self {
            state,
            run_id: None,
            validation: None,
            storage: None,
            rebuild: None,
            error: Some(error),
        }
    }
}

/// The submission pipeline.
pub struct Pipeline {
    store: ResultStore,
    registry: SchemaRegistry,
    policy: CompositePolicy,
    aggregates_dir: PathBuf,
}

impl Pipeline {
    /// Creates a pipeline over the given directories and composite policy.
    pub fn new(
        submissions_dir: impl Into<PathBuf>,
        aggregates_dir: impl Into<PathBuf>,
        policy: CompositePolicy,
    ) -> PipelineResult<Self> {
        policy.validate().map_err(PipelineError::Config)?;
        let store = ResultStore::open(submissions_dir.into())?;
        Ok(Self {
            store,
            registry: SchemaRegistry::builtin(),
            policy,
            aggregates_dir: aggregates_dir.into(),
        })
    }

    /// Returns the store backing this pipeline.
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Drives one raw submission through the state machine.
    pub fn submit(&self, raw: &str) -> SubmissionReport {
        log_event(Event::SubmissionReceived, &[("bytes", &raw.len().to_string())]);

        // Received -> Parsed | ParseFailed
        let document_value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                log_event(Event::ParseFailed, &[("reason", &e.to_string())]);
                return SubmissionReport::failed(
                    SubmissionState::ParseFailed,
                    format!("Submission is not well-formed JSON: {}", e),
                );
            }
        };

        // Parsed -> Validated | Invalid
        let validator = SchemaValidator::new(&self.registry);
        let validation = match validator.validate_document(&document_value) {
            Ok(report) => report,
            Err(e) => {
                let event = match e.code() {
                    SchemaErrorCode::UnsupportedSchemaVersion => Event::UnsupportedSchemaVersion,
                    SchemaErrorCode::ParseFailed => Event::ParseFailed,
                };
                log_event(event, &[("reason", e.message())]);
                return SubmissionReport::failed(SubmissionState::Invalid, e.to_string());
            }
        };

        if !validation.passed {
            log_event(
                Event::ValidationFailed,
                &[("errors", &validation.error_count().to_string())],
            );
            return SubmissionReport {
                state: SubmissionState::Invalid,
                run_id: None,
                validation: Some(validation),
                storage: None,
                rebuild: None,
                error: Some("Schema validation failed".to_string()),
            };
        }
        log_event(Event::ValidationPassed, &[]);

        let mut document: ResultDocument = match serde_json::from_value(document_value) {
            Ok(document) => document,
            Err(e) => {
                // A validated document should always fit the model; treat a
                // mismatch as a rejection, not a crash
                return SubmissionReport::failed(
                    SubmissionState::Invalid,
                    format!("Validated document did not match the record model: {}", e),
                );
            }
        };
        let run_id = document.run_id().to_string();

        // Validated -> Stored | StorageFailed
        if let Err(e) = self.stamp_metadata(&mut document, &validation) {
            log_event(Event::StoreFailed, &[("reason", &e.to_string())]);
            return SubmissionReport {
                state: SubmissionState::StorageFailed,
                run_id: Some(run_id),
                validation: Some(validation),
                storage: None,
                rebuild: None,
                error: Some(e.to_string()),
            };
        }

        let outcome = match self.store.put(&document) {
            Ok(outcome) => outcome,
            Err(e) => {
                log_event(
                    Event::StoreFailed,
                    &[("reason", &e.to_string()), ("run_id", &run_id)],
                );
                return SubmissionReport {
                    state: SubmissionState::StorageFailed,
                    run_id: Some(run_id),
                    validation: Some(validation),
                    storage: None,
                    rebuild: None,
                    error: Some(e.to_string()),
                };
            }
        };

        let stored_event = match outcome.status {
            StorageStatus::DuplicateReplaced => Event::DuplicateReplaced,
            _ => Event::ResultStored,
        };
        log_event(
            stored_event,
            &[
                ("path", &outcome.path.display().to_string()),
                ("run_id", &run_id),
            ],
        );

        // Stored -> Aggregated
        match self.rebuild() {
            Ok(summary) => SubmissionReport {
                state: SubmissionState::Aggregated,
                run_id: Some(run_id),
                validation: Some(validation),
                storage: Some(outcome),
                rebuild: Some(summary),
                error: None,
            },
            Err(e) => {
                // The record is stored; only the leaderboard refresh failed.
                // The next rebuild will pick it up.
                log_event(Event::RebuildFailed, &[("reason", &e.to_string())]);
                SubmissionReport {
                    state: SubmissionState::Stored,
                    run_id: Some(run_id),
                    validation: Some(validation),
                    storage: Some(outcome),
                    rebuild: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Rebuilds the leaderboard from the full store and writes both outputs
    /// atomically.
    pub fn rebuild(&self) -> PipelineResult<RebuildSummary> {
        let engine = AggregationEngine::new(self.policy.clone());
        let records = self.store.iter()?;
        let output = engine.rebuild(records);

        fs::create_dir_all(&self.aggregates_dir).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to create aggregates directory {}: {}",
                self.aggregates_dir.display(),
                e
            ))
        })?;

        let leaderboard_path = self.aggregates_dir.join(LEADERBOARD_FILE);
        let body = serde_json::to_string_pretty(&output.leaderboard).map_err(|e| {
            PipelineError::Config(format!("Failed to serialize leaderboard: {}", e))
        })?;
        write_output(&leaderboard_path, body.as_bytes())?;

        let csv_path = self.aggregates_dir.join(CSV_FILE);
        write_output(&csv_path, output.csv.as_bytes())?;

        Ok(RebuildSummary {
            total_results: output.leaderboard.total_results,
            warning_count: output.warnings.len(),
        })
    }

    /// Appends processing, validation, and storage metadata before the
    /// record is persisted. Aggregation metadata is never stamped: rebuilds
    /// only read.
    fn stamp_metadata(
        &self,
        document: &mut ResultDocument,
        validation: &ValidationReport,
    ) -> PipelineResult<()> {
        let now = utc_now_iso();
        let (year, month) = ResultStore::partition_for(document.submitted_timestamp())?;

        document.result_data.processing = Some(Processing {
            ingest_id: Uuid::new_v4(),
            validation_status: ValidationStatus::Valid,
            storage_status: StorageStatus::Pending,
            ingested_timestamp: now.clone(),
            processed_timestamp: None,
        });
        document.result_data.validation_metadata = Some(ValidationMetadata {
            validated_at: now.clone(),
            validator_version: env!("CARGO_PKG_VERSION").to_string(),
            error_count: validation.error_count(),
        });
        document.result_data.storage_metadata = Some(StorageMetadata {
            stored_at: now,
            partition_year: year,
            partition_month: month,
            relative_path: format!(
                "{:04}/{:02}/{}.json",
                year,
                month,
                document.run_id()
            ),
        });
        Ok(())
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> PipelineResult<()> {
    write_atomic(path, bytes).map_err(|source| PipelineError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Current time in the wire timestamp format (ISO-8601 UTC, milliseconds).
fn utc_now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
