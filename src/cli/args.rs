//! CLI argument definitions using clap
//!
//! Commands:
//! - benchboard validate [FILE] --config <path>
//! - benchboard store [FILE] --config <path>
//! - benchboard submit [FILE] --config <path>
//! - benchboard aggregate --config <path>
//!
//! FILE defaults to stdin; `-` also selects stdin.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// benchboard - A strict, deterministic benchmark-result leaderboard pipeline
#[derive(Parser, Debug)]
#[command(name = "benchboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a submission and print the full validation report
    Validate {
        /// Path to the submission JSON ("-" or absent reads stdin)
        input: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long, default_value = "./benchboard.json")]
        config: PathBuf,
    },

    /// Validate and persist a submission without rebuilding the leaderboard
    Store {
        /// Path to the submission JSON ("-" or absent reads stdin)
        input: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long, default_value = "./benchboard.json")]
        config: PathBuf,
    },

    /// Run the full pipeline: validate, store, rebuild the leaderboard
    Submit {
        /// Path to the submission JSON ("-" or absent reads stdin)
        input: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long, default_value = "./benchboard.json")]
        config: PathBuf,
    },

    /// Rebuild the leaderboard and CSV export from the current store
    Aggregate {
        /// Path to configuration file
        #[arg(long, default_value = "./benchboard.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
