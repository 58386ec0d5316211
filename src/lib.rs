//! benchboard - A strict, deterministic benchmark-result leaderboard pipeline
//!
//! Turns untrusted, user-submitted JSON benchmark-result documents into a
//! canonical, deduplicated, deterministically ordered leaderboard.

pub mod aggregate;
pub mod cli;
pub mod observability;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod store;
