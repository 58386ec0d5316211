//! Result Store subsystem for benchboard
//!
//! Persists validated result documents under a year/month partition derived
//! from the submission timestamp, with one file per unique `run_id` across
//! the whole store.
//!
//! # Design Principles
//!
//! - Identity is `run_id` alone, independent of partition
//! - Last write wins: a resubmission removes every older file for its run_id
//! - Writes commit via temp-file-then-rename; readers never observe a
//!   half-written record
//! - Concurrent writers are serialized around locate-then-write
//! - Reads used by aggregation surface per-file failures instead of aborting

mod errors;
mod index;
mod store;

pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use index::RunIndex;
pub use store::{write_atomic, RecordIter, ResultStore, StorageOutcome, StoredRecord};
