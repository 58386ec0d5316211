//! Declarative schema rule types and validation reports
//!
//! A schema version is a table of `FieldRule`s. Each rule names one field by
//! its dot/bracket path and declares what must hold when it is present. The
//! generic validator interprets the table; nothing here executes checks.

use serde::Serialize;
use serde_json::Value;

/// Supported field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 string
    String,
    /// Integer (no fractional part)
    Integer,
    /// Any JSON number
    Number,
    /// Boolean
    Boolean,
    /// Nested object
    Object,
    /// Array
    Array,
}

impl FieldKind {
    /// Returns the kind name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
        }
    }

    /// Returns whether a JSON value has this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::Array => value.is_array(),
        }
    }
}

/// One allowed value of an enum-restricted field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumValue {
    Str(&'static str),
    Int(i64),
}

impl EnumValue {
    /// Returns whether a JSON value equals this allowed value.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            EnumValue::Str(s) => value.as_str() == Some(s),
            EnumValue::Int(i) => value.as_i64() == Some(*i),
        }
    }
}

impl std::fmt::Display for EnumValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnumValue::Str(s) => write!(f, "{}", s),
            EnumValue::Int(i) => write!(f, "{}", i),
        }
    }
}

/// Named value patterns interpreted by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePattern {
    /// ISO-8601 UTC: YYYY-MM-DDTHH:MM:SS[.sss]Z
    Timestamp,
}

/// One declarative field rule.
///
/// `path` uses dot segments; a segment ending in `[]` fans out over the
/// array's elements (`...test_runs[].pass_rate`). `requires` names an
/// optional subtree: the rule applies only while that subtree is present,
/// which is how the api/ui conditional sub-structures are expressed as data.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub path: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub requires: Option<&'static str>,
    pub allowed: Option<&'static [EnumValue]>,
    pub pattern: Option<ValuePattern>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldRule {
    /// A required field of the given kind.
    pub const fn required(path: &'static str, kind: FieldKind) -> Self {
        Self {
            path,
            kind,
            required: true,
            requires: None,
            allowed: None,
            pattern: None,
            min: None,
            max: None,
        }
    }

    /// An optional field of the given kind.
    pub const fn optional(path: &'static str, kind: FieldKind) -> Self {
        let mut rule = Self::required(path, kind);
        rule.required = false;
        rule
    }

    /// Restrict this rule to documents where `anchor` is present.
    pub const fn within(mut self, anchor: &'static str) -> Self {
        self.requires = Some(anchor);
        self
    }

    /// Restrict the field to a fixed set of values.
    pub const fn one_of(mut self, values: &'static [EnumValue]) -> Self {
        self.allowed = Some(values);
        self
    }

    /// Require the ISO-8601 UTC timestamp format.
    pub const fn timestamp(mut self) -> Self {
        self.pattern = Some(ValuePattern::Timestamp);
        self
    }

    /// Require the value to be at least `min`.
    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Require the value to be at most `max`.
    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Require the value to lie in `[min, max]`.
    pub const fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationError {
    /// Dot/bracket JSON path, e.g. `result_data.run_identity.tool_name`
    pub field_path: String,
    /// Human-readable description
    pub message: String,
    /// Machine-readable code
    pub code: &'static str,
}

impl ValidationError {
    pub fn missing(field_path: impl Into<String>) -> Self {
        let field_path = field_path.into();
        Self {
            message: format!("Missing required field '{}'", field_path),
            field_path,
            code: "REQUIRED_FIELD_MISSING",
        }
    }

    pub fn type_mismatch(
        field_path: impl Into<String>,
        expected: &str,
        actual: &str,
    ) -> Self {
        Self {
            field_path: field_path.into(),
            message: format!("Type mismatch: expected {}, got {}", expected, actual),
            code: "TYPE_MISMATCH",
        }
    }

    pub fn enum_violation(
        field_path: impl Into<String>,
        value: &Value,
        allowed: &[EnumValue],
    ) -> Self {
        let allowed_list = allowed
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            field_path: field_path.into(),
            message: format!("Invalid value {} (allowed: {})", value, allowed_list),
            code: "INVALID_ENUM_VALUE",
        }
    }

    pub fn bad_timestamp(field_path: impl Into<String>, value: &str) -> Self {
        Self {
            field_path: field_path.into(),
            message: format!(
                "Invalid timestamp '{}' (expected ISO-8601 UTC: YYYY-MM-DDTHH:MM:SS[.sss]Z)",
                value
            ),
            code: "INVALID_TIMESTAMP_FORMAT",
        }
    }

    pub fn out_of_range(field_path: impl Into<String>, value: f64, bound: &str, limit: f64) -> Self {
        Self {
            field_path: field_path.into(),
            message: format!("Value {} violates {} {}", value, bound, limit),
            code: "VALUE_OUT_OF_RANGE",
        }
    }

    pub fn missing_implementation() -> Self {
        Self {
            field_path: "result_data.implementations".to_string(),
            message: "At least one of 'api' or 'ui' must be present".to_string(),
            code: "MISSING_IMPLEMENTATION",
        }
    }

    pub fn passrate_inconsistent(reported: f64, derived: f64) -> Self {
        Self {
            field_path: "result_data.implementations.api.acceptance.passrate".to_string(),
            message: format!(
                "Reported passrate {} contradicts pass/fail counts (derived {:.3})",
                reported, derived
            ),
            code: "PASSRATE_INCONSISTENT",
        }
    }
}

/// Outcome of validating one document. Never partial: either every rule of
/// the selected schema version ran, or parsing failed before validation
/// started and no report exists.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Build a report from the collected errors.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            passed: errors.is_empty(),
            errors,
        }
    }

    /// Returns the number of collected errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
