//! Observability subsystem for benchboard
//!
//! Provides:
//! - Structured logging (JSON, one line per event)
//! - Pipeline lifecycle events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on pipeline execution
//! 3. No async or background threads
//! 4. Deterministic output (alphabetical field ordering)

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields.
///
/// Failure events go to stderr, everything else to stdout.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    if event.is_failure() {
        Logger::error(event.as_str(), fields);
    } else {
        Logger::info(event.as_str(), fields);
    }
}
