//! CLI module for benchboard
//!
//! Provides the command-line interface:
//! - validate: check one submission, print the validation report
//! - store: persist one validated submission
//! - submit: run the full pipeline (validate, store, rebuild)
//! - aggregate: rebuild the leaderboard from the current store

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{run_command, Config};
pub use errors::{CliError, CliResult};

/// Parses arguments and dispatches. Returns the process exit code.
pub fn run() -> CliResult<i32> {
    let cli = Cli::parse_args();
    run_command(cli)
}
