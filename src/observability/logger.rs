//! Structured JSON logger for benchboard
//!
//! - Structured logs (JSON)
//! - Deterministic key ordering (event, severity, then fields alphabetically)
//! - One log line = one event
//! - Synchronous, no buffering

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations
    Info = 0,
    /// Recoverable issues (records skipped, duplicates replaced)
    Warn = 1,
    /// Stage failures
    Error = 2,
    /// Unrecoverable, process exits
    Fatal = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured logger that outputs one JSON line per event.
///
/// Fields are sorted alphabetically by key so that identical events
/// produce byte-identical lines regardless of caller field order.
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields to stdout.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        Self::log_to_writer(severity, event, fields, &mut io::stdout());
    }

    /// Log to stderr (for errors and fatal messages).
    pub fn log_stderr(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        Self::log_to_writer(severity, event, fields, &mut io::stderr());
    }

    /// Internal log implementation that writes to a given writer.
    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let mut line = String::with_capacity(128);

        line.push_str("{\"event\":\"");
        Self::escape_json_string(&mut line, event);
        line.push_str("\",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push('"');

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted {
            line.push_str(",\"");
            Self::escape_json_string(&mut line, key);
            line.push_str("\":\"");
            Self::escape_json_string(&mut line, value);
            line.push('"');
        }

        line.push_str("}\n");

        // One write_all per event keeps lines intact under interleaving
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    /// Escape special characters for JSON strings
    fn escape_json_string(out: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        }
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log_stderr(Severity::Error, event, fields);
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log_stderr(Severity::Fatal, event, fields);
    }
}

/// Capture a log line to a string for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_log_is_valid_json() {
        let output = capture_log(Severity::Info, "REBUILD_COMPLETE", &[("entries", "4")]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "REBUILD_COMPLETE");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["entries"], "4");
    }

    #[test]
    fn test_field_order_is_deterministic() {
        let a = capture_log(
            Severity::Warn,
            "RECORD_SKIPPED",
            &[("run_id", "x1"), ("path", "a.json"), ("reason", "corrupt")],
        );
        let b = capture_log(
            Severity::Warn,
            "RECORD_SKIPPED",
            &[("reason", "corrupt"), ("path", "a.json"), ("run_id", "x1")],
        );
        assert_eq!(a, b);

        let path_pos = a.find("\"path\"").unwrap();
        let reason_pos = a.find("\"reason\"").unwrap();
        let run_id_pos = a.find("\"run_id\"").unwrap();
        assert!(path_pos < reason_pos);
        assert!(reason_pos < run_id_pos);
    }

    #[test]
    fn test_event_comes_first() {
        let output = capture_log(Severity::Info, "CONFIG_LOADED", &[("a", "1")]);
        assert!(output.starts_with("{\"event\""));
    }

    #[test]
    fn test_escapes_special_chars() {
        let output = capture_log(
            Severity::Error,
            "PARSE_FAILED",
            &[("reason", "expected `\"` at line 3\n")],
        );
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["reason"], "expected `\"` at line 3\n");
    }

    #[test]
    fn test_one_line_per_event() {
        let output = capture_log(Severity::Info, "TEST", &[("a", "1"), ("b", "2")]);
        assert_eq!(output.chars().filter(|c| *c == '\n').count(), 1);
        assert!(output.ends_with('\n'));
    }
}
