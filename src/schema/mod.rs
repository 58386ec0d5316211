//! Schema Validator subsystem for benchboard
//!
//! Versioned, declarative validation of raw submissions. Schema versions are
//! described as rule tables (path, kind, required, enum, pattern, range) and
//! interpreted by one generic validator, so new versions are added by data,
//! not new code paths.
//!
//! # Design Principles
//!
//! - Parse failures are reported separately from schema failures
//! - Unrecognized schema versions fail before any field checks
//! - Checking is exhaustive: every violation is collected in one pass
//! - Validation is pure and deterministic; no I/O, no mutation
//! - The predecessor schema version stays valid under the newer version's
//!   optional-superset rules

mod errors;
mod registry;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use registry::{SchemaDef, SchemaRegistry};
pub use types::{
    EnumValue, FieldKind, FieldRule, ValidationError, ValidationReport, ValuePattern,
};
pub use validator::SchemaValidator;
