//! Submission pipeline for benchboard
//!
//! Drives one raw submission through the full state machine:
//!
//! ```text
//! Received -> Parsed | ParseFailed
//!          -> Validated | Invalid
//!          -> Stored | StorageFailed
//!          -> Aggregated
//! ```
//!
//! `ParseFailed`, `Invalid`, and `StorageFailed` are terminal failure
//! states: the submission is reported to the notification channel and never
//! advances. Every successful store triggers a full leaderboard rebuild.

mod errors;
mod runner;
mod state;

pub use errors::{PipelineError, PipelineResult};
pub use runner::{Pipeline, RebuildSummary, SubmissionReport, CSV_FILE, LEADERBOARD_FILE};
pub use state::SubmissionState;
