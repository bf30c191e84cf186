//! Bulk alert-rule import engine.
//!
//! This crate provides:
//! - Tolerant decoding of exported rule payloads (single object or array)
//! - Datasource category inference and conflict detection
//! - Extraction and merging of per-query parameter overrides
//! - Batch submission through a pluggable [`submit::RuleSink`]
//! - Aggregation of per-item results into an [`report::ImportReport`]

pub mod error;
pub mod overrides;
pub mod payload;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod submit;
pub mod validation;

pub use error::{ImportError, Result};
pub use pipeline::{ImportPipeline, ImportPreview, ImportRequest, PreparedBatch};
pub use report::{ImportReport, ImportStatus};
