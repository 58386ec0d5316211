//! benchboard CLI entry point
//!
//! This is a minimal entrypoint that:
//! 1. Parses CLI arguments (via cli::run)
//! 2. Dispatches to CLI commands (via cli::run)
//! 3. Prints errors to stderr
//! 4. Exits with the command's exit code
//!
//! All logic is delegated to the CLI module. Exit codes: 0 on success,
//! 1 when a submission is rejected or a stage fails, 2 on CLI/config errors.

use benchboard::cli;

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    }
}
