//! Pipeline lifecycle events
//!
//! One event per observable transition of a submission or rebuild.
//! Event names are stable identifiers consumed by log tooling.

/// Lifecycle events emitted by the submission pipeline and the
/// aggregation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A raw submission entered the pipeline
    SubmissionReceived,
    /// The submission body was not well-formed JSON
    ParseFailed,
    /// Schema validation passed with zero errors
    ValidationPassed,
    /// Schema validation collected one or more errors
    ValidationFailed,
    /// The declared schema version is not registered
    UnsupportedSchemaVersion,
    /// A validated record was written to a new identity key
    ResultStored,
    /// A validated record superseded an existing record with the same run_id
    DuplicateReplaced,
    /// The store rejected the write with an I/O failure
    StoreFailed,
    /// A full leaderboard rebuild started
    RebuildStarted,
    /// A full leaderboard rebuild finished and outputs were written
    RebuildComplete,
    /// The rebuild could not write its outputs
    RebuildFailed,
    /// A stored file could not be read or parsed during a rebuild
    UnreadableRecord,
    /// A readable record was excluded from the leaderboard
    RecordSkipped,
    /// Configuration was loaded (or defaulted)
    ConfigLoaded,
}

impl Event {
    /// Returns the stable event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SubmissionReceived => "SUBMISSION_RECEIVED",
            Event::ParseFailed => "PARSE_FAILED",
            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::UnsupportedSchemaVersion => "UNSUPPORTED_SCHEMA_VERSION",
            Event::ResultStored => "RESULT_STORED",
            Event::DuplicateReplaced => "DUPLICATE_REPLACED",
            Event::StoreFailed => "STORE_FAILED",
            Event::RebuildStarted => "REBUILD_STARTED",
            Event::RebuildComplete => "REBUILD_COMPLETE",
            Event::RebuildFailed => "REBUILD_FAILED",
            Event::UnreadableRecord => "UNREADABLE_RECORD",
            Event::RecordSkipped => "RECORD_SKIPPED",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Returns whether this event marks a failure of the current stage.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::ParseFailed
                | Event::ValidationFailed
                | Event::UnsupportedSchemaVersion
                | Event::StoreFailed
                | Event::RebuildFailed
        )
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
