//! Store error types
//!
//! Error codes:
//! - BENCH_STORE_WRITE_FAILED — write, remove, or commit rename failed
//! - BENCH_STORE_READ_FAILED — directory scan or file read failed
//! - BENCH_STORE_BAD_TIMESTAMP — partition timestamp did not parse
//!
//! There is no automatic retry: every error is surfaced to the caller, which
//! reports it to the notification channel.

use std::fmt;
use std::io;

/// Store-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Record write failed
    WriteFailed,
    /// Record or directory read failed
    ReadFailed,
    /// Submission timestamp could not be parsed for partitioning
    BadTimestamp,
}

impl StoreErrorCode {
    /// Returns the string code.
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::WriteFailed => "BENCH_STORE_WRITE_FAILED",
            StoreErrorCode::ReadFailed => "BENCH_STORE_READ_FAILED",
            StoreErrorCode::BadTimestamp => "BENCH_STORE_BAD_TIMESTAMP",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with context.
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl StoreError {
    /// Create a write failure with an I/O source.
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::WriteFailed,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a write failure without an I/O source.
    pub fn write_failed_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::WriteFailed,
            message: message.into(),
            source: None,
        }
    }

    /// Create a read failure with an I/O source.
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::ReadFailed,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a read failure without an I/O source.
    pub fn read_failed_no_source(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::ReadFailed,
            message: message.into(),
            source: None,
        }
    }

    /// Create a bad-timestamp error.
    pub fn bad_timestamp(timestamp: &str, reason: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::BadTimestamp,
            message: format!(
                "Cannot derive partition from timestamp '{}': {}",
                timestamp,
                reason.into()
            ),
            source: None,
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code.code(), self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StoreErrorCode::WriteFailed.code(), "BENCH_STORE_WRITE_FAILED");
        assert_eq!(StoreErrorCode::ReadFailed.code(), "BENCH_STORE_READ_FAILED");
        assert_eq!(StoreErrorCode::BadTimestamp.code(), "BENCH_STORE_BAD_TIMESTAMP");
    }

    #[test]
    fn test_display_contains_code_and_source() {
        let err = StoreError::write_failed(
            "disk full",
            io::Error::new(io::ErrorKind::Other, "no space left"),
        );
        let display = format!("{}", err);
        assert!(display.contains("BENCH_STORE_WRITE_FAILED"));
        assert!(display.contains("disk full"));
        assert!(display.contains("no space left"));
    }

    #[test]
    fn test_bad_timestamp_message() {
        let err = StoreError::bad_timestamp("not-a-date", "invalid format");
        assert_eq!(err.code(), StoreErrorCode::BadTimestamp);
        assert!(err.message().contains("not-a-date"));
    }
}
