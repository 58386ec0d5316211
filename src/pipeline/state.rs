//! Submission state machine
//!
//! States advance strictly forward; the three failure states are terminal.

use serde::Serialize;

/// Lifecycle state of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// Raw text received, nothing checked yet
    Received,
    /// Parsed as JSON
    Parsed,
    /// Not well-formed JSON (terminal)
    ParseFailed,
    /// Passed schema validation
    Validated,
    /// Rejected by schema validation or unsupported version (terminal)
    Invalid,
    /// Persisted under its identity key
    Stored,
    /// The store reported an I/O failure (terminal)
    StorageFailed,
    /// Included in the rebuilt leaderboard
    Aggregated,
}

impl SubmissionState {
    /// Returns whether this state ends the submission's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::ParseFailed
                | SubmissionState::Invalid
                | SubmissionState::StorageFailed
                | SubmissionState::Aggregated
        )
    }

    /// Returns whether this state is a terminal failure.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SubmissionState::ParseFailed
                | SubmissionState::Invalid
                | SubmissionState::StorageFailed
        )
    }

    /// Returns whether `next` is a legal successor of this state.
    pub fn can_advance_to(&self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        matches!(
            (*self, next),
            (Received, Parsed)
                | (Received, ParseFailed)
                | (Parsed, Validated)
                | (Parsed, Invalid)
                | (Validated, Stored)
                | (Validated, StorageFailed)
                | (Stored, Aggregated)
        )
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SubmissionState::Received => "received",
            SubmissionState::Parsed => "parsed",
            SubmissionState::ParseFailed => "parse_failed",
            SubmissionState::Validated => "validated",
            SubmissionState::Invalid => "invalid",
            SubmissionState::Stored => "stored",
            SubmissionState::StorageFailed => "storage_failed",
            SubmissionState::Aggregated => "aggregated",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubmissionState::*;

    #[test]
    fn test_terminal_states() {
        assert!(ParseFailed.is_terminal());
        assert!(Invalid.is_terminal());
        assert!(StorageFailed.is_terminal());
        assert!(Aggregated.is_terminal());
        assert!(!Received.is_terminal());
        assert!(!Validated.is_terminal());
    }

    #[test]
    fn test_failure_states() {
        assert!(ParseFailed.is_failure());
        assert!(Invalid.is_failure());
        assert!(StorageFailed.is_failure());
        assert!(!Aggregated.is_failure());
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(Received.can_advance_to(Parsed));
        assert!(Parsed.can_advance_to(Validated));
        assert!(Validated.can_advance_to(Stored));
        assert!(Stored.can_advance_to(Aggregated));
    }

    #[test]
    fn test_failure_states_never_advance() {
        for terminal in [ParseFailed, Invalid, StorageFailed] {
            for next in [
                Received, Parsed, ParseFailed, Validated, Invalid, Stored, StorageFailed,
                Aggregated,
            ] {
                assert!(!terminal.can_advance_to(next));
            }
        }
    }

    #[test]
    fn test_no_stage_skipping() {
        assert!(!Received.can_advance_to(Validated));
        assert!(!Received.can_advance_to(Stored));
        assert!(!Parsed.can_advance_to(Stored));
        assert!(!Validated.can_advance_to(Aggregated));
    }

    #[test]
    fn test_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(StorageFailed).unwrap(),
            serde_json::json!("storage_failed")
        );
        assert_eq!(
            serde_json::to_value(Aggregated).unwrap(),
            serde_json::json!("aggregated")
        );
    }
}
