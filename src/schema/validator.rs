//! Generic rule-table validator
//!
//! Validation semantics:
//! - The document's declared `schema_version` selects the rule table; an
//!   unrecognized version fails before any field checks
//! - Every rule is evaluated; all violations are collected in one pass so a
//!   submitter gets complete feedback in one round-trip
//! - A rule anchored on an optional subtree is skipped while that subtree is
//!   absent
//! - `null` is treated as absent: required fields reject it, optional checks
//!   skip it
//! - Cross-field invariants run after the rule table: at least one of
//!   `implementations.api` / `implementations.ui` must be present, and a
//!   reported passrate must agree with the pass/fail counts
//!
//! The validator is pure: no side effects, no I/O. The caller decides
//! whether to persist, notify, or reject.

use regex::Regex;
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::registry::SchemaRegistry;
use super::types::{FieldRule, ValidationError, ValidationReport, ValuePattern};

/// ISO-8601 UTC with optional milliseconds: YYYY-MM-DDTHH:MM:SS[.sss]Z
const TIMESTAMP_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d{3})?Z$";

/// Tolerated gap between a reported passrate and the rate derived from
/// pass/fail counts, to absorb rounding in submitted documents.
const PASSRATE_TOLERANCE: f64 = 0.005;

/// Schema validator backed by a registry of versioned rule tables.
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
    timestamp_re: Regex,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator over the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            timestamp_re: Regex::new(TIMESTAMP_PATTERN).expect("timestamp pattern compiles"),
        }
    }

    /// Parses a raw submission and validates it.
    ///
    /// # Errors
    ///
    /// - `BENCH_PARSE_FAILED` if the input is not well-formed JSON; the
    ///   document never reaches field validation
    /// - `BENCH_UNSUPPORTED_SCHEMA_VERSION` for an unknown declared version
    pub fn validate_str(&self, raw: &str) -> SchemaResult<ValidationReport> {
        let document: Value =
            serde_json::from_str(raw).map_err(|e| SchemaError::parse_failed(e.to_string()))?;
        self.validate_document(&document)
    }

    /// Validates a parsed document against its declared schema version.
    ///
    /// Returns a complete `ValidationReport`; `Err` only for the two
    /// pre-validation failures (parse handled by `validate_str`, unknown
    /// version here).
    pub fn validate_document(&self, document: &Value) -> SchemaResult<ValidationReport> {
        let supported = self.registry.supported_versions();

        let declared = match document.get("schema_version").and_then(Value::as_str) {
            Some(version) => version,
            None => return Err(SchemaError::unsupported_version("<none>", &supported)),
        };

        let def = self
            .registry
            .get(declared)
            .ok_or_else(|| SchemaError::unsupported_version(declared, &supported))?;

        let mut errors = Vec::new();

        if !document.is_object() {
            errors.push(ValidationError::type_mismatch(
                "$root",
                "object",
                json_type_name(document),
            ));
            return Ok(ValidationReport::from_errors(errors));
        }

        for rule in def.rules() {
            self.apply_rule(document, rule, &mut errors);
        }

        self.check_cross_field(document, &mut errors);

        Ok(ValidationReport::from_errors(errors))
    }

    /// Evaluates one rule, appending any violations.
    fn apply_rule(&self, document: &Value, rule: &FieldRule, errors: &mut Vec<ValidationError>) {
        if let Some(anchor) = rule.requires {
            let present = resolve(document, anchor)
                .iter()
                .any(|(_, value)| value.is_some());
            if !present {
                return;
            }
        }

        for (path, value) in resolve(document, rule.path) {
            match value {
                None => {
                    if rule.required {
                        errors.push(ValidationError::missing(path));
                    }
                }
                Some(value) => self.check_value(&path, value, rule, errors),
            }
        }
    }

    /// Checks a present value against the rule's kind, enum, pattern, and
    /// range constraints. Each violated constraint yields its own error.
    fn check_value(
        &self,
        path: &str,
        value: &Value,
        rule: &FieldRule,
        errors: &mut Vec<ValidationError>,
    ) {
        if !rule.kind.matches(value) {
            errors.push(ValidationError::type_mismatch(
                path,
                rule.kind.name(),
                json_type_name(value),
            ));
        }

        if let Some(allowed) = rule.allowed {
            if !allowed.iter().any(|candidate| candidate.matches(value)) {
                errors.push(ValidationError::enum_violation(path, value, allowed));
            }
        }

        if let Some(ValuePattern::Timestamp) = rule.pattern {
            if let Some(s) = value.as_str() {
                if !self.timestamp_re.is_match(s) {
                    errors.push(ValidationError::bad_timestamp(path, s));
                }
            }
        }

        if let Some(n) = value.as_f64() {
            if let Some(min) = rule.min {
                if n < min {
                    errors.push(ValidationError::out_of_range(path, n, "minimum", min));
                }
            }
            if let Some(max) = rule.max {
                if n > max {
                    errors.push(ValidationError::out_of_range(path, n, "maximum", max));
                }
            }
        }
    }

    /// Invariants that span fields and cannot be expressed as one rule.
    fn check_cross_field(&self, document: &Value, errors: &mut Vec<ValidationError>) {
        if let Some(impls) = document
            .pointer("/result_data/implementations")
            .and_then(Value::as_object)
        {
            let has_api = impls.get("api").map_or(false, |v| !v.is_null());
            let has_ui = impls.get("ui").map_or(false, |v| !v.is_null());
            if !has_api && !has_ui {
                errors.push(ValidationError::missing_implementation());
            }
        }

        if let Some(acceptance) = document
            .pointer("/result_data/implementations/api/acceptance")
            .and_then(Value::as_object)
        {
            let reported = acceptance.get("passrate").and_then(Value::as_f64);
            let pass = acceptance.get("pass_count").and_then(Value::as_u64);
            let fail = acceptance.get("fail_count").and_then(Value::as_u64);
            if let (Some(reported), Some(pass), Some(fail)) = (reported, pass, fail) {
                let finished = pass + fail;
                if finished > 0 {
                    let derived = pass as f64 / finished as f64;
                    if (reported - derived).abs() > PASSRATE_TOLERANCE {
                        errors.push(ValidationError::passrate_inconsistent(reported, derived));
                    }
                }
            }
        }
    }
}

/// One parsed segment of a rule path.
struct PathSeg<'p> {
    name: &'p str,
    /// `name[]`: fan out over the array's elements
    each: bool,
}

fn parse_path(path: &str) -> Vec<PathSeg<'_>> {
    path.split('.')
        .map(|segment| match segment.strip_suffix("[]") {
            Some(name) => PathSeg { name, each: true },
            None => PathSeg {
                name: segment,
                each: false,
            },
        })
        .collect()
}

/// Resolves a rule path to concrete (path, value) pairs.
///
/// Array segments fan out, producing one pair per element with the index
/// substituted into the path. A missing or null field yields a `None` value
/// under the full remaining path. A wrong-typed ancestor yields nothing: its
/// own rule reports the type mismatch.
fn resolve<'a>(root: &'a Value, path: &str) -> Vec<(String, Option<&'a Value>)> {
    let segments = parse_path(path);
    let mut out = Vec::new();
    resolve_into(root, &segments, String::new(), &mut out);
    out
}

fn resolve_into<'a>(
    value: &'a Value,
    segments: &[PathSeg<'_>],
    prefix: String,
    out: &mut Vec<(String, Option<&'a Value>)>,
) {
    let (segment, rest) = match segments.split_first() {
        Some(split) => split,
        None => {
            out.push((prefix, Some(value)));
            return;
        }
    };

    let object = match value.as_object() {
        Some(object) => object,
        None => return,
    };

    let child_path = if prefix.is_empty() {
        segment.name.to_string()
    } else {
        format!("{}.{}", prefix, segment.name)
    };

    match object.get(segment.name) {
        None | Some(Value::Null) => {
            out.push((append_remaining(child_path, rest), None));
        }
        Some(child) => {
            if segment.each {
                let array = match child.as_array() {
                    Some(array) => array,
                    None => return,
                };
                for (index, element) in array.iter().enumerate() {
                    resolve_into(element, rest, format!("{}[{}]", child_path, index), out);
                }
            } else {
                resolve_into(child, rest, child_path, out);
            }
        }
    }
}

fn append_remaining(mut base: String, rest: &[PathSeg<'_>]) -> String {
    for segment in rest {
        base.push('.');
        base.push_str(segment.name);
    }
    base
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;
    use serde_json::json;

    fn sample_document() -> Value {
        json!({
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
                "implementations": {
                    "api": {
                        "generation_metrics": {
                            "llm_model": "model-x",
                            "start_timestamp": "2025-01-15T10:00:00Z",
                            "end_timestamp": "2025-01-15T10:42:00Z",
                            "duration_minutes": 42.0,
                            "clarifications_count": 0,
                            "interventions_count": 0,
                            "reruns_count": 1
                        },
                        "acceptance": {
                            "pass_count": 9,
                            "fail_count": 1,
                            "not_run_count": 0,
                            "passrate": 0.9
                        },
                        "artifacts": {
                            "contract_artifact_path": "artifacts/contract.yaml",
                            "run_instructions_path": "artifacts/RUN.md"
                        }
                    }
                },
                "submission": {
                    "submitted_timestamp": "2025-01-15T11:00:00Z",
                    "submitted_by": "alice",
                    "submission_method": "automated"
                }
            }
        })
    }

    #[test]
    fn test_conforming_document_passes() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let report = validator.validate_document(&sample_document()).unwrap();
        assert!(report.passed, "unexpected errors: {:?}", report.errors);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn test_missing_tool_name_exact_path() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["result_data"]["run_identity"]
            .as_object_mut()
            .unwrap()
            .remove("tool_name");

        let report = validator.validate_document(&doc).unwrap();
        assert!(!report.passed);
        assert!(report
            .errors
            .iter()
            .any(|e| e.field_path == "result_data.run_identity.tool_name"
                && e.code == "REQUIRED_FIELD_MISSING"));
    }

    #[test]
    fn test_all_violations_collected_in_one_pass() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["result_data"]["run_identity"]["target_model"] = json!("C");
        doc["result_data"]["run_identity"]["run_number"] = json!(3);
        doc["result_data"]["implementations"]["api"]["acceptance"]["pass_count"] = json!(-1);
        doc["result_data"]["submission"]["submitted_timestamp"] = json!("yesterday");

        let report = validator.validate_document(&doc).unwrap();
        let codes: Vec<&str> = report.errors.iter().map(|e| e.code).collect();
        assert!(codes.contains(&"INVALID_ENUM_VALUE"));
        assert!(codes.contains(&"VALUE_OUT_OF_RANGE"));
        assert!(codes.contains(&"INVALID_TIMESTAMP_FORMAT"));
        assert!(report.error_count() >= 4);
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["result_data"]["run_identity"]["tool_version"] = json!(null);

        let report = validator.validate_document(&doc).unwrap();
        assert!(report
            .errors
            .iter()
            .any(|e| e.field_path == "result_data.run_identity.tool_version"
                && e.code == "REQUIRED_FIELD_MISSING"));
    }

    #[test]
    fn test_no_implementation_rejected() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["result_data"]["implementations"] = json!({});

        let report = validator.validate_document(&doc).unwrap();
        assert!(report
            .errors
            .iter()
            .any(|e| e.code == "MISSING_IMPLEMENTATION"));
    }

    #[test]
    fn test_ui_only_document_passes() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["result_data"]["implementations"] = json!({
            "ui": {
                "generation_metrics": {
                    "llm_model": "model-x",
                    "start_timestamp": "2025-01-15T10:00:00Z",
                    "end_timestamp": "2025-01-15T10:30:00Z",
                    "duration_minutes": 30.0,
                    "clarifications_count": 0,
                    "interventions_count": 0,
                    "reruns_count": 0
                },
                "build_success": true,
                "artifacts": {
                    "ui_source_path": "ui/src",
                    "ui_run_summary_path": "ui/SUMMARY.md"
                }
            }
        });

        let report = validator.validate_document(&doc).unwrap();
        assert!(report.passed, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_present_api_requires_substructure() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["result_data"]["implementations"]["api"]
            .as_object_mut()
            .unwrap()
            .remove("acceptance");

        let report = validator.validate_document(&doc).unwrap();
        assert!(report
            .errors
            .iter()
            .any(|e| e.field_path == "result_data.implementations.api.acceptance"));
    }

    #[test]
    fn test_array_elements_validated_with_indexed_paths() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["result_data"]["implementations"]["api"]["generation_metrics"]["test_runs"] = json!([
            { "pass_rate": 0.5 },
            { "pass_rate": 1.5 }
        ]);

        let report = validator.validate_document(&doc).unwrap();
        assert!(report.errors.iter().any(|e| e.field_path
            == "result_data.implementations.api.generation_metrics.test_runs[1].pass_rate"));
        assert!(!report.errors.iter().any(|e| e.field_path
            == "result_data.implementations.api.generation_metrics.test_runs[0].pass_rate"));
    }

    #[test]
    fn test_inconsistent_passrate_flagged() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["result_data"]["implementations"]["api"]["acceptance"]["passrate"] = json!(0.5);

        let report = validator.validate_document(&doc).unwrap();
        assert!(report
            .errors
            .iter()
            .any(|e| e.code == "PASSRATE_INCONSISTENT"));
    }

    #[test]
    fn test_unsupported_version_fails_before_field_checks() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        // Otherwise empty document: no field errors may be produced
        let doc = json!({ "schema_version": "9.9" });
        let err = validator.validate_document(&doc).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnsupportedSchemaVersion);
        assert_eq!(err.declared_version(), Some("9.9"));
    }

    #[test]
    fn test_missing_version_is_unsupported() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let err = validator.validate_document(&json!({})).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::UnsupportedSchemaVersion);
    }

    #[test]
    fn test_parse_failure_is_distinct() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let err = validator.validate_str("{ not json").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::ParseFailed);
    }

    #[test]
    fn test_v2_document_accepted() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["schema_version"] = json!("2.0");

        let report = validator.validate_document(&doc).unwrap();
        assert!(report.passed, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_validation_is_deterministic() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let mut doc = sample_document();
        doc["result_data"]["run_identity"]["target_model"] = json!("C");
        doc["result_data"]["submission"]["submitted_timestamp"] = json!("bad");

        let first = validator.validate_document(&doc).unwrap();
        for _ in 0..20 {
            let again = validator.validate_document(&doc).unwrap();
            assert_eq!(again.errors, first.errors);
        }
    }
}
