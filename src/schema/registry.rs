//! Versioned schema definitions
//!
//! Each schema version is a set of rule tables. Version "3.0" is the current
//! schema; version "2.0" is its predecessor. The v3 definition is the shared
//! core plus rules for the v3-only sections, all of which are optional, so
//! every valid 2.0 document is also valid under 3.0 — absence of newer
//! fields is never an error. Adding a schema version means adding a rule
//! table, not a code path.

use super::types::{EnumValue, FieldKind, FieldRule};

const TARGET_MODELS: &[EnumValue] = &[EnumValue::Str("A"), EnumValue::Str("B")];
const API_STYLES: &[EnumValue] = &[EnumValue::Str("REST"), EnumValue::Str("GraphQL")];
const RUN_NUMBERS: &[EnumValue] = &[EnumValue::Int(1), EnumValue::Int(2)];
const SUBMISSION_METHODS: &[EnumValue] =
    &[EnumValue::Str("automated"), EnumValue::Str("manual")];
const DETERMINISM_COMPLIANCE: &[EnumValue] = &[
    EnumValue::Str("Pass"),
    EnumValue::Str("Fail"),
    EnumValue::Str("Unknown"),
];
const INSTRUCTIONS_QUALITY_RATINGS: &[EnumValue] = &[
    EnumValue::Int(100),
    EnumValue::Int(70),
    EnumValue::Int(40),
    EnumValue::Int(0),
];
const REPRODUCIBILITY_RATINGS: &[EnumValue] = &[
    EnumValue::Str("None"),
    EnumValue::Str("Minor"),
    EnumValue::Str("Major"),
    EnumValue::Str("Unknown"),
];
const USAGE_SOURCES: &[EnumValue] = &[
    EnumValue::Str("tool_reported"),
    EnumValue::Str("operator_estimated"),
    EnumValue::Str("unknown"),
];
const VALIDATION_STATUSES: &[EnumValue] = &[
    EnumValue::Str("pending"),
    EnumValue::Str("valid"),
    EnumValue::Str("invalid"),
    EnumValue::Str("error"),
];
const STORAGE_STATUSES: &[EnumValue] = &[
    EnumValue::Str("pending"),
    EnumValue::Str("stored"),
    EnumValue::Str("failed"),
    EnumValue::Str("duplicate_replaced"),
];

const RUN_IDENTITY: &str = "result_data.run_identity";
const API: &str = "result_data.implementations.api";
const API_METRICS: &str = "result_data.implementations.api.generation_metrics";
const API_USAGE: &str = "result_data.implementations.api.generation_metrics.llm_usage";
const API_ACCEPTANCE: &str = "result_data.implementations.api.acceptance";
const API_QUALITY: &str = "result_data.implementations.api.quality_metrics";
const UI: &str = "result_data.implementations.ui";
const UI_METRICS: &str = "result_data.implementations.ui.generation_metrics";
const SUBMISSION: &str = "result_data.submission";

/// Rules shared by schema versions 2.0 and 3.0.
static CORE_RULES: &[FieldRule] = &[
    FieldRule::required("schema_version", FieldKind::String),
    FieldRule::required("result_data", FieldKind::Object),
    // --- run identity ---
    FieldRule::required(RUN_IDENTITY, FieldKind::Object).within("result_data"),
    FieldRule::required("result_data.run_identity.tool_name", FieldKind::String)
        .within(RUN_IDENTITY),
    FieldRule::required("result_data.run_identity.tool_version", FieldKind::String)
        .within(RUN_IDENTITY),
    FieldRule::required("result_data.run_identity.run_id", FieldKind::String)
        .within(RUN_IDENTITY),
    FieldRule::required("result_data.run_identity.run_number", FieldKind::Integer)
        .within(RUN_IDENTITY)
        .one_of(RUN_NUMBERS),
    FieldRule::required("result_data.run_identity.target_model", FieldKind::String)
        .within(RUN_IDENTITY)
        .one_of(TARGET_MODELS),
    FieldRule::required("result_data.run_identity.api_style", FieldKind::String)
        .within(RUN_IDENTITY)
        .one_of(API_STYLES),
    FieldRule::required("result_data.run_identity.spec_reference", FieldKind::String)
        .within(RUN_IDENTITY),
    FieldRule::required("result_data.run_identity.workspace_path", FieldKind::String)
        .within(RUN_IDENTITY),
    FieldRule::required("result_data.run_identity.run_environment", FieldKind::String)
        .within(RUN_IDENTITY),
    // --- implementations ---
    FieldRule::required("result_data.implementations", FieldKind::Object).within("result_data"),
    FieldRule::optional(API, FieldKind::Object).within("result_data.implementations"),
    FieldRule::optional(UI, FieldKind::Object).within("result_data.implementations"),
    // --- api generation metrics ---
    FieldRule::required(API_METRICS, FieldKind::Object).within(API),
    FieldRule::required(
        "result_data.implementations.api.generation_metrics.llm_model",
        FieldKind::String,
    )
    .within(API_METRICS),
    FieldRule::required(
        "result_data.implementations.api.generation_metrics.start_timestamp",
        FieldKind::String,
    )
    .within(API_METRICS)
    .timestamp(),
    FieldRule::required(
        "result_data.implementations.api.generation_metrics.end_timestamp",
        FieldKind::String,
    )
    .within(API_METRICS)
    .timestamp(),
    FieldRule::required(
        "result_data.implementations.api.generation_metrics.duration_minutes",
        FieldKind::Number,
    )
    .within(API_METRICS)
    .min(0.0),
    FieldRule::required(
        "result_data.implementations.api.generation_metrics.clarifications_count",
        FieldKind::Integer,
    )
    .within(API_METRICS)
    .min(0.0),
    FieldRule::required(
        "result_data.implementations.api.generation_metrics.interventions_count",
        FieldKind::Integer,
    )
    .within(API_METRICS)
    .min(0.0),
    FieldRule::required(
        "result_data.implementations.api.generation_metrics.reruns_count",
        FieldKind::Integer,
    )
    .within(API_METRICS)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.test_iterations_count",
        FieldKind::Integer,
    )
    .within(API_METRICS)
    .min(1.0),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.test_runs",
        FieldKind::Array,
    )
    .within(API_METRICS),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.test_runs[].start_timestamp",
        FieldKind::String,
    )
    .within(API_METRICS)
    .timestamp(),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.test_runs[].end_timestamp",
        FieldKind::String,
    )
    .within(API_METRICS)
    .timestamp(),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.test_runs[].pass_rate",
        FieldKind::Number,
    )
    .within(API_METRICS)
    .range(0.0, 1.0),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.test_runs[].total_tests",
        FieldKind::Integer,
    )
    .within(API_METRICS)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.test_runs[].passed",
        FieldKind::Integer,
    )
    .within(API_METRICS)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.test_runs[].failed",
        FieldKind::Integer,
    )
    .within(API_METRICS)
    .min(0.0),
    // --- api llm usage ---
    FieldRule::optional(API_USAGE, FieldKind::Object).within(API_METRICS),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.llm_usage.usage_source",
        FieldKind::String,
    )
    .within(API_USAGE)
    .one_of(USAGE_SOURCES),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.llm_usage.input_tokens",
        FieldKind::Integer,
    )
    .within(API_USAGE)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.llm_usage.output_tokens",
        FieldKind::Integer,
    )
    .within(API_USAGE)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.llm_usage.total_tokens",
        FieldKind::Integer,
    )
    .within(API_USAGE)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.llm_usage.requests_count",
        FieldKind::Integer,
    )
    .within(API_USAGE)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.api.generation_metrics.llm_usage.estimated_cost_usd",
        FieldKind::Number,
    )
    .within(API_USAGE)
    .min(0.0),
    // --- api acceptance ---
    FieldRule::required(API_ACCEPTANCE, FieldKind::Object).within(API),
    FieldRule::required(
        "result_data.implementations.api.acceptance.pass_count",
        FieldKind::Integer,
    )
    .within(API_ACCEPTANCE)
    .min(0.0),
    FieldRule::required(
        "result_data.implementations.api.acceptance.fail_count",
        FieldKind::Integer,
    )
    .within(API_ACCEPTANCE)
    .min(0.0),
    FieldRule::required(
        "result_data.implementations.api.acceptance.not_run_count",
        FieldKind::Integer,
    )
    .within(API_ACCEPTANCE)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.api.acceptance.passrate",
        FieldKind::Number,
    )
    .within(API_ACCEPTANCE)
    .range(0.0, 1.0),
    // --- api artifacts ---
    FieldRule::required("result_data.implementations.api.artifacts", FieldKind::Object)
        .within(API),
    FieldRule::required(
        "result_data.implementations.api.artifacts.contract_artifact_path",
        FieldKind::String,
    )
    .within("result_data.implementations.api.artifacts"),
    FieldRule::required(
        "result_data.implementations.api.artifacts.run_instructions_path",
        FieldKind::String,
    )
    .within("result_data.implementations.api.artifacts"),
    // --- api quality metrics ---
    FieldRule::optional(API_QUALITY, FieldKind::Object).within(API),
    FieldRule::optional(
        "result_data.implementations.api.quality_metrics.determinism_compliance",
        FieldKind::String,
    )
    .within(API_QUALITY)
    .one_of(DETERMINISM_COMPLIANCE),
    FieldRule::optional(
        "result_data.implementations.api.quality_metrics.overreach_incidents_count",
        FieldKind::Integer,
    )
    .within(API_QUALITY)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.api.quality_metrics.contract_completeness_passrate",
        FieldKind::Number,
    )
    .within(API_QUALITY)
    .range(0.0, 1.0),
    FieldRule::optional(
        "result_data.implementations.api.quality_metrics.instructions_quality_rating",
        FieldKind::Integer,
    )
    .within(API_QUALITY)
    .one_of(INSTRUCTIONS_QUALITY_RATINGS),
    FieldRule::optional(
        "result_data.implementations.api.quality_metrics.reproducibility_rating",
        FieldKind::String,
    )
    .within(API_QUALITY)
    .one_of(REPRODUCIBILITY_RATINGS),
    // --- ui ---
    FieldRule::required(UI_METRICS, FieldKind::Object).within(UI),
    FieldRule::required(
        "result_data.implementations.ui.generation_metrics.llm_model",
        FieldKind::String,
    )
    .within(UI_METRICS),
    FieldRule::required(
        "result_data.implementations.ui.generation_metrics.start_timestamp",
        FieldKind::String,
    )
    .within(UI_METRICS)
    .timestamp(),
    FieldRule::required(
        "result_data.implementations.ui.generation_metrics.end_timestamp",
        FieldKind::String,
    )
    .within(UI_METRICS)
    .timestamp(),
    FieldRule::required(
        "result_data.implementations.ui.generation_metrics.duration_minutes",
        FieldKind::Number,
    )
    .within(UI_METRICS)
    .min(0.0),
    FieldRule::required(
        "result_data.implementations.ui.generation_metrics.clarifications_count",
        FieldKind::Integer,
    )
    .within(UI_METRICS)
    .min(0.0),
    FieldRule::required(
        "result_data.implementations.ui.generation_metrics.interventions_count",
        FieldKind::Integer,
    )
    .within(UI_METRICS)
    .min(0.0),
    FieldRule::required(
        "result_data.implementations.ui.generation_metrics.reruns_count",
        FieldKind::Integer,
    )
    .within(UI_METRICS)
    .min(0.0),
    FieldRule::optional(
        "result_data.implementations.ui.generation_metrics.backend_changes_required",
        FieldKind::Boolean,
    )
    .within(UI_METRICS),
    FieldRule::required("result_data.implementations.ui.build_success", FieldKind::Boolean)
        .within(UI),
    FieldRule::required("result_data.implementations.ui.artifacts", FieldKind::Object)
        .within(UI),
    FieldRule::required(
        "result_data.implementations.ui.artifacts.ui_source_path",
        FieldKind::String,
    )
    .within("result_data.implementations.ui.artifacts"),
    FieldRule::required(
        "result_data.implementations.ui.artifacts.ui_run_summary_path",
        FieldKind::String,
    )
    .within("result_data.implementations.ui.artifacts"),
    // --- submission ---
    FieldRule::required(SUBMISSION, FieldKind::Object).within("result_data"),
    FieldRule::required(
        "result_data.submission.submitted_timestamp",
        FieldKind::String,
    )
    .within(SUBMISSION)
    .timestamp(),
    FieldRule::required("result_data.submission.submitted_by", FieldKind::String)
        .within(SUBMISSION),
    FieldRule::required(
        "result_data.submission.submission_method",
        FieldKind::String,
    )
    .within(SUBMISSION)
    .one_of(SUBMISSION_METHODS),
];

const GITHUB_ISSUE: &str = "result_data.submission.github_issue";
const PROCESSING: &str = "result_data.processing";
const STORAGE_META: &str = "result_data.storage_metadata";
const VALIDATION_META: &str = "result_data.validation_metadata";
const AGGREGATION_META: &str = "result_data.aggregation_metadata";

/// Rules for sections introduced by schema version 3.0. All optional: their
/// absence is what keeps 2.0 documents valid under 3.0.
static V3_RULES: &[FieldRule] = &[
    FieldRule::optional(GITHUB_ISSUE, FieldKind::Object).within(SUBMISSION),
    FieldRule::optional(
        "result_data.submission.github_issue.issue_number",
        FieldKind::Integer,
    )
    .within(GITHUB_ISSUE)
    .min(1.0),
    FieldRule::optional(
        "result_data.submission.github_issue.issue_url",
        FieldKind::String,
    )
    .within(GITHUB_ISSUE),
    FieldRule::optional(
        "result_data.submission.github_issue.issue_created_at",
        FieldKind::String,
    )
    .within(GITHUB_ISSUE)
    .timestamp(),
    FieldRule::optional(
        "result_data.submission.github_issue.issue_closed_at",
        FieldKind::String,
    )
    .within(GITHUB_ISSUE)
    .timestamp(),
    FieldRule::optional(PROCESSING, FieldKind::Object).within("result_data"),
    FieldRule::optional("result_data.processing.ingest_id", FieldKind::String)
        .within(PROCESSING),
    FieldRule::optional("result_data.processing.validation_status", FieldKind::String)
        .within(PROCESSING)
        .one_of(VALIDATION_STATUSES),
    FieldRule::optional("result_data.processing.storage_status", FieldKind::String)
        .within(PROCESSING)
        .one_of(STORAGE_STATUSES),
    FieldRule::optional(
        "result_data.processing.ingested_timestamp",
        FieldKind::String,
    )
    .within(PROCESSING)
    .timestamp(),
    FieldRule::optional(
        "result_data.processing.processed_timestamp",
        FieldKind::String,
    )
    .within(PROCESSING)
    .timestamp(),
    FieldRule::optional(STORAGE_META, FieldKind::Object).within("result_data"),
    FieldRule::optional("result_data.storage_metadata.stored_at", FieldKind::String)
        .within(STORAGE_META)
        .timestamp(),
    FieldRule::optional(
        "result_data.storage_metadata.partition_year",
        FieldKind::Integer,
    )
    .within(STORAGE_META),
    FieldRule::optional(
        "result_data.storage_metadata.partition_month",
        FieldKind::Integer,
    )
    .within(STORAGE_META)
    .range(1.0, 12.0),
    FieldRule::optional(
        "result_data.storage_metadata.relative_path",
        FieldKind::String,
    )
    .within(STORAGE_META),
    FieldRule::optional(VALIDATION_META, FieldKind::Object).within("result_data"),
    FieldRule::optional(
        "result_data.validation_metadata.validated_at",
        FieldKind::String,
    )
    .within(VALIDATION_META)
    .timestamp(),
    FieldRule::optional(
        "result_data.validation_metadata.validator_version",
        FieldKind::String,
    )
    .within(VALIDATION_META),
    FieldRule::optional(
        "result_data.validation_metadata.error_count",
        FieldKind::Integer,
    )
    .within(VALIDATION_META)
    .min(0.0),
    FieldRule::optional(AGGREGATION_META, FieldKind::Object).within("result_data"),
    FieldRule::optional(
        "result_data.aggregation_metadata.last_aggregated_at",
        FieldKind::String,
    )
    .within(AGGREGATION_META)
    .timestamp(),
    FieldRule::optional(
        "result_data.aggregation_metadata.csv_export_timestamp",
        FieldKind::String,
    )
    .within(AGGREGATION_META)
    .timestamp(),
];

static V2_GROUPS: &[&[FieldRule]] = &[CORE_RULES];
static V3_GROUPS: &[&[FieldRule]] = &[CORE_RULES, V3_RULES];

/// One versioned schema definition: an ordered set of rule tables.
#[derive(Debug, Clone, Copy)]
pub struct SchemaDef {
    version: &'static str,
    rule_groups: &'static [&'static [FieldRule]],
}

impl SchemaDef {
    /// Returns the version string this definition validates.
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Iterates every rule in table order. The order is the error-report
    /// order, so it must stay stable.
    pub fn rules(&self) -> impl Iterator<Item = &'static FieldRule> {
        self.rule_groups.iter().flat_map(|group| group.iter())
    }
}

/// Registry of known schema versions.
pub struct SchemaRegistry {
    defs: Vec<SchemaDef>,
}

impl SchemaRegistry {
    /// The built-in registry: versions 2.0 and 3.0.
    pub fn builtin() -> Self {
        Self {
            defs: vec![
                SchemaDef {
                    version: "2.0",
                    rule_groups: V2_GROUPS,
                },
                SchemaDef {
                    version: "3.0",
                    rule_groups: V3_GROUPS,
                },
            ],
        }
    }

    /// Looks up a schema definition by declared version.
    pub fn get(&self, version: &str) -> Option<&SchemaDef> {
        self.defs.iter().find(|def| def.version == version)
    }

    /// Returns the supported version strings, registration order.
    pub fn supported_versions(&self) -> Vec<&'static str> {
        self.defs.iter().map(|def| def.version).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_versions() {
        let registry = SchemaRegistry::builtin();
        assert!(registry.get("2.0").is_some());
        assert!(registry.get("3.0").is_some());
        assert!(registry.get("1.0").is_none());
        assert_eq!(registry.supported_versions(), vec!["2.0", "3.0"]);
    }

    #[test]
    fn test_v3_is_superset_of_v2() {
        let registry = SchemaRegistry::builtin();
        let v2_count = registry.get("2.0").unwrap().rules().count();
        let v3_count = registry.get("3.0").unwrap().rules().count();
        assert!(v3_count > v2_count);
    }

    #[test]
    fn test_v3_extra_rules_are_all_optional() {
        for rule in V3_RULES {
            assert!(
                !rule.required,
                "v3-only rule for '{}' must be optional to keep 2.0 documents valid",
                rule.path
            );
        }
    }

    #[test]
    fn test_rule_paths_are_unique_per_version() {
        let registry = SchemaRegistry::builtin();
        for version in ["2.0", "3.0"] {
            let def = registry.get(version).unwrap();
            let mut seen = std::collections::HashSet::new();
            for rule in def.rules() {
                assert!(seen.insert(rule.path), "duplicate rule for '{}'", rule.path);
            }
        }
    }

    #[test]
    fn test_anchored_rules_reference_declared_paths() {
        let registry = SchemaRegistry::builtin();
        let def = registry.get("3.0").unwrap();
        let paths: std::collections::HashSet<_> = def.rules().map(|r| r.path).collect();
        for rule in def.rules() {
            if let Some(anchor) = rule.requires {
                assert!(
                    paths.contains(anchor) || anchor == "result_data",
                    "anchor '{}' of rule '{}' has no rule of its own",
                    anchor,
                    rule.path
                );
            }
        }
    }
}
