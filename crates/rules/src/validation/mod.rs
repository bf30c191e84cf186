//! Batch validation: category consistency and structural checks.
//!
//! Category consistency is an aggregate property of the whole batch and is
//! reported as a [`CategoryCheck`]. Structural checks walk every record and
//! return a [`ValidationResult`] with errors (block submission) and warnings
//! (advisory).

mod category;
mod structure_checks;

pub(crate) mod fuzzy;

pub use category::{check_categories, resolve_category, CategoryCheck};

use crate::schema::RuleRecord;
use serde::{Deserialize, Serialize};

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"[0].rule_config.queries[1].var_config"`.
    pub path: String,
    pub message: String,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Run the structural checks over a normalized batch.
pub fn validate_batch(records: &[RuleRecord]) -> ValidationResult {
    let mut result = ValidationResult::new();
    for (index, record) in records.iter().enumerate() {
        structure_checks::validate_record(index, record, &mut result);
    }
    result
}
