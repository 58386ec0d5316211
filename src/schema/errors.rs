//! Schema error types
//!
//! Error codes:
//! - BENCH_PARSE_FAILED (REJECT) — input is not well-formed JSON
//! - BENCH_UNSUPPORTED_SCHEMA_VERSION (REJECT) — unknown declared version
//!
//! Field-level violations are not errors of this type: they travel inside a
//! `ValidationReport` so the submitter receives the complete list at once.

use std::fmt;

/// Schema-level error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Input could not be parsed as JSON
    ParseFailed,
    /// Declared schema version is not registered
    UnsupportedSchemaVersion,
}

impl SchemaErrorCode {
    /// Returns the string code.
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::ParseFailed => "BENCH_PARSE_FAILED",
            SchemaErrorCode::UnsupportedSchemaVersion => "BENCH_UNSUPPORTED_SCHEMA_VERSION",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with context. Both codes are terminal for the submission:
/// nothing is stored and the error is surfaced to the notification channel.
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    declared_version: Option<String>,
}

impl SchemaError {
    /// Create a parse failure error.
    pub fn parse_failed(reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::ParseFailed,
            message: format!("Submission is not well-formed JSON: {}", reason.into()),
            declared_version: None,
        }
    }

    /// Create an unsupported schema version error.
    pub fn unsupported_version(declared: impl Into<String>, supported: &[&str]) -> Self {
        let declared = declared.into();
        Self {
            code: SchemaErrorCode::UnsupportedSchemaVersion,
            message: format!(
                "Schema version '{}' is not supported (supported: {})",
                declared,
                supported.join(", ")
            ),
            declared_version: Some(declared),
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the declared schema version, if one was read.
    pub fn declared_version(&self) -> Option<&str> {
        self.declared_version.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::ParseFailed.code(), "BENCH_PARSE_FAILED");
        assert_eq!(
            SchemaErrorCode::UnsupportedSchemaVersion.code(),
            "BENCH_UNSUPPORTED_SCHEMA_VERSION"
        );
    }

    #[test]
    fn test_unsupported_version_lists_supported() {
        let err = SchemaError::unsupported_version("1.0", &["2.0", "3.0"]);
        assert_eq!(err.declared_version(), Some("1.0"));
        assert!(err.message().contains("2.0, 3.0"));
    }

    #[test]
    fn test_display_contains_code() {
        let err = SchemaError::parse_failed("unexpected end of input");
        let display = format!("{}", err);
        assert!(display.contains("BENCH_PARSE_FAILED"));
        assert!(display.contains("REJECT"));
    }
}
