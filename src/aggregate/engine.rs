//! Full-rebuild aggregation engine
//!
//! Every invocation recomputes the entire leaderboard from the current set
//! of stored records. Unreadable files and records without rankable metrics
//! are excluded with one warning each; a rebuild never aborts over a bad
//! record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::observability::{log_event, Event, Logger};
use crate::record::{ApiStyle, TargetModel};
use crate::store::{StoreResult, StoredRecord};

use super::csv::export_csv;
use super::entry::{derive_entry, LeaderboardEntry};
use super::score::CompositePolicy;
use super::views::{sorted_by_composite, sorted_by_quality, sorted_by_speed};

/// The multiply-sorted leaderboard snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardDocument {
    pub generated_at: DateTime<Utc>,
    pub total_results: usize,
    /// All entries, in stored-record order
    pub results: Vec<LeaderboardEntry>,
    pub sorted_by_quality: Vec<LeaderboardEntry>,
    pub sorted_by_speed: Vec<LeaderboardEntry>,
    pub sorted_by_composite: Vec<LeaderboardEntry>,
}

/// Everything one rebuild produces.
#[derive(Debug, Clone)]
pub struct RebuildOutput {
    pub leaderboard: LeaderboardDocument,
    pub csv: String,
    /// Entries grouped by benchmark configuration, for the external report
    /// renderer
    pub groups: Vec<EntryGroup>,
    /// One warning per excluded record
    pub warnings: Vec<String>,
}

/// Entries sharing one benchmark configuration, for downstream report
/// rendering.
#[derive(Debug, Clone, Serialize)]
pub struct EntryGroup {
    pub spec_reference: String,
    pub target_model: TargetModel,
    pub api_style: ApiStyle,
    pub run_ids: Vec<String>,
}

/// The full-rebuild aggregation engine.
pub struct AggregationEngine {
    policy: CompositePolicy,
}

impl AggregationEngine {
    /// Creates an engine with the given composite policy.
    pub fn new(policy: CompositePolicy) -> Self {
        Self { policy }
    }

    /// Rebuilds the leaderboard and CSV export from the given records.
    ///
    /// Idempotent: an unchanged record set yields identical output except
    /// for `generated_at`. Per-record failures become warnings, never
    /// aborts.
    pub fn rebuild<I>(&self, records: I) -> RebuildOutput
    where
        I: IntoIterator<Item = StoreResult<StoredRecord>>,
    {
        log_event(Event::RebuildStarted, &[]);

        let mut entries = Vec::new();
        let mut warnings = Vec::new();

        for item in records {
            match item {
                Ok(record) => match derive_entry(&record.document, &record.path) {
                    Ok(entry) => entries.push(entry),
                    Err(reason) => {
                        let warning = format!(
                            "skipping {}: {}",
                            record.path.display(),
                            reason
                        );
                        Logger::warn(
                            Event::RecordSkipped.as_str(),
                            &[
                                ("path", &record.path.display().to_string()),
                                ("reason", &reason.to_string()),
                            ],
                        );
                        warnings.push(warning);
                    }
                },
                Err(e) => {
                    let warning = format!("unreadable record: {}", e);
                    Logger::warn(
                        Event::UnreadableRecord.as_str(),
                        &[("reason", &e.to_string())],
                    );
                    warnings.push(warning);
                }
            }
        }

        self.policy.score_entries(&mut entries);

        let leaderboard = LeaderboardDocument {
            generated_at: Utc::now(),
            total_results: entries.len(),
            sorted_by_quality: sorted_by_quality(&entries),
            sorted_by_speed: sorted_by_speed(&entries),
            sorted_by_composite: sorted_by_composite(&entries),
            results: entries,
        };
        let csv = export_csv(&leaderboard.results);
        let groups = group_by_configuration(&leaderboard.results);

        log_event(
            Event::RebuildComplete,
            &[
                ("entries", &leaderboard.total_results.to_string()),
                ("groups", &groups.len().to_string()),
                ("warnings", &warnings.len().to_string()),
            ],
        );

        RebuildOutput {
            leaderboard,
            csv,
            groups,
            warnings,
        }
    }
}

/// Groups entries by the exact (spec_reference, target_model, api_style)
/// tuple. Matching is exact string equality, deliberately not normalized or
/// case-insensitive: configurations that differ only in case are different
/// configurations. Groups and their members come back in deterministic
/// order.
pub fn group_by_configuration(entries: &[LeaderboardEntry]) -> Vec<EntryGroup> {
    use std::collections::BTreeMap;

    let mut groups: BTreeMap<(String, TargetModel, ApiStyle), Vec<String>> = BTreeMap::new();
    for entry in entries {
        groups
            .entry((
                entry.spec_reference.clone(),
                entry.target_model,
                entry.api_style,
            ))
            .or_default()
            .push(entry.run_id.clone());
    }

    groups
        .into_iter()
        .map(|((spec_reference, target_model, api_style), mut run_ids)| {
            run_ids.sort();
            EntryGroup {
                spec_reference,
                target_model,
                api_style,
                run_ids,
            }
        })
        .collect()
}
