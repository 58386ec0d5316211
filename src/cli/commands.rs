//! CLI command implementations
//!
//! Each command loads configuration, builds the subsystems it needs, and
//! prints one JSON document on stdout. Exit codes: 0 success, 1 when the
//! submission was rejected or a stage failed, 2 for CLI/config errors
//! (mapped in main).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::aggregate::CompositePolicy;
use crate::observability::{log_event, Event};
use crate::pipeline::Pipeline;
use crate::record::ResultDocument;
use crate::schema::{SchemaRegistry, SchemaValidator};
use crate::store::ResultStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_json};

fn default_submissions_dir() -> String {
    "submissions".to_string()
}

fn default_aggregates_dir() -> String {
    "aggregates".to_string()
}

/// Configuration file structure (benchboard.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the partitioned submission store
    #[serde(default = "default_submissions_dir")]
    pub submissions_dir: String,

    /// Directory receiving leaderboard.json and results.csv
    #[serde(default = "default_aggregates_dir")]
    pub aggregates_dir: String,

    /// Composite score weights
    #[serde(default)]
    pub composite: CompositePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submissions_dir: default_submissions_dir(),
            aggregates_dir: default_aggregates_dir(),
            composite: CompositePolicy::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a file; a missing file means defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            let config = Config::default();
            log_event(Event::ConfigLoaded, &[("source", "defaults")]);
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;

        log_event(
            Event::ConfigLoaded,
            &[("source", &path.display().to_string())],
        );
        Ok(config)
    }

    /// Validates the configuration.
    fn validate(&self) -> CliResult<()> {
        if self.submissions_dir.is_empty() {
            return Err(CliError::config_error("submissions_dir must not be empty"));
        }
        if self.aggregates_dir.is_empty() {
            return Err(CliError::config_error("aggregates_dir must not be empty"));
        }
        self.composite
            .validate()
            .map_err(CliError::config_error)?;
        Ok(())
    }
}

/// Dispatches a parsed CLI invocation. Returns the exit code.
pub fn run_command(cli: Cli) -> CliResult<i32> {
    match cli.command {
        Command::Validate { input, config } => {
            let _config = Config::load(&config)?;
            validate(input.as_deref())
        }
        Command::Store { input, config } => {
            let config = Config::load(&config)?;
            store(input.as_deref(), &config)
        }
        Command::Submit { input, config } => {
            let config = Config::load(&config)?;
            submit(input.as_deref(), &config)
        }
        Command::Aggregate { config } => {
            let config = Config::load(&config)?;
            aggregate(&config)
        }
    }
}

/// Validate one submission and print the full report.
fn validate(input: Option<&Path>) -> CliResult<i32> {
    let raw = read_input(input)?;
    let registry = SchemaRegistry::builtin();
    let validator = SchemaValidator::new(&registry);

    match validator.validate_str(&raw) {
        Ok(report) => {
            let passed = report.passed;
            write_json(&report)?;
            Ok(if passed { 0 } else { 1 })
        }
        Err(e) => {
            write_json(&json!({
                "passed": false,
                "error": { "code": e.code().code(), "message": e.message() }
            }))?;
            Ok(1)
        }
    }
}

/// Validate and persist one submission; no rebuild.
fn store(input: Option<&Path>, config: &Config) -> CliResult<i32> {
    let raw = read_input(input)?;
    let registry = SchemaRegistry::builtin();
    let validator = SchemaValidator::new(&registry);

    let report = match validator.validate_str(&raw) {
        Ok(report) => report,
        Err(e) => {
            write_json(&json!({
                "passed": false,
                "error": { "code": e.code().code(), "message": e.message() }
            }))?;
            return Ok(1);
        }
    };
    if !report.passed {
        write_json(&report)?;
        return Ok(1);
    }

    let document: ResultDocument = serde_json::from_str(&raw)
        .map_err(|e| CliError::io_error(format!("Validated document did not parse: {}", e)))?;

    let result_store = ResultStore::open(&config.submissions_dir)
        .map_err(|e| CliError::io_error(e.to_string()))?;
    match result_store.put(&document) {
        Ok(outcome) => {
            write_json(&outcome)?;
            Ok(0)
        }
        Err(e) => {
            write_json(&json!({
                "status": "failed",
                "error": { "code": e.code().code(), "message": e.message() }
            }))?;
            Ok(1)
        }
    }
}

/// Run the full pipeline for one submission.
fn submit(input: Option<&Path>, config: &Config) -> CliResult<i32> {
    let raw = read_input(input)?;
    let pipeline = Pipeline::new(
        &config.submissions_dir,
        &config.aggregates_dir,
        config.composite.clone(),
    )
    .map_err(|e| CliError::config_error(e.to_string()))?;

    let report = pipeline.submit(&raw);
    let ok = !report.state.is_failure();
    write_json(&report)?;
    Ok(if ok { 0 } else { 1 })
}

/// Rebuild the leaderboard from the current store.
fn aggregate(config: &Config) -> CliResult<i32> {
    let pipeline = Pipeline::new(
        &config.submissions_dir,
        &config.aggregates_dir,
        config.composite.clone(),
    )
    .map_err(|e| CliError::config_error(e.to_string()))?;

    let summary = pipeline
        .rebuild()
        .map_err(|e| CliError::io_error(e.to_string()))?;
    write_json(&summary)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = Config::load(Path::new("/definitely/not/benchboard.json")).unwrap();
        assert_eq!(config.submissions_dir, "submissions");
        assert_eq!(config.aggregates_dir, "aggregates");
        assert_eq!(config.composite.passrate_weight, 0.7);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("benchboard.json");
        fs::write(&path, r#"{ "submissions_dir": "data/submissions" }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.submissions_dir, "data/submissions");
        assert_eq!(config.aggregates_dir, "aggregates");
    }

    #[test]
    fn test_invalid_config_json_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("benchboard.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code().code(), "BENCH_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("benchboard.json");
        fs::write(
            &path,
            r#"{ "composite": { "passrate_weight": -2.0, "duration_weight": 0.3 } }"#,
        )
        .unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code().code(), "BENCH_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_empty_dirs_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("benchboard.json");
        fs::write(&path, r#"{ "submissions_dir": "" }"#).unwrap();

        assert!(Config::load(&path).is_err());
    }
}
