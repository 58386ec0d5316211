//! CLI input/output helpers
//!
//! Submissions arrive as a file path or stdin; reports leave as
//! pretty-printed JSON on stdout.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Reads the submission text from a file, or stdin when the path is absent
/// or "-".
pub fn read_input(input: Option<&Path>) -> CliResult<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e))),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| CliError::io_error(format!("Failed to read stdin: {}", e)))?;
            Ok(buffer)
        }
    }
}

/// Prints a value as pretty JSON on stdout.
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io_error(format!("Failed to render output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
