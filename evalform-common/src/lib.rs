//! # Evalform Common Library
//!
//! Shared code for the evaluation form service:
//! - Record schema (single source of truth for all field lists)
//! - Submission validation and coercion
//! - Typed evaluation records
//! - Category view and CSV export
//! - Configuration resolution
//! - Database initialization and column sync

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod metrics;
pub mod record;
pub mod schema;
pub mod submission;

pub use error::{Error, Result};
pub use record::{EvaluationFields, EvaluationRecord, FieldValue};
pub use submission::RawSubmission;
