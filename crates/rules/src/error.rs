//! Error types for an import attempt.

use crate::overrides::MergeKey;
use crate::schema::Category;
use crate::submit::SinkError;
use crate::validation::ValidationError;

/// Errors that stop an import attempt.
///
/// Every variant except [`ImportError::Sink`] is raised before the remote
/// call, so no rule has been created when one is returned. Per-item remote
/// failures are not errors; they are reported in [`crate::report::ImportReport`].
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The raw text is not JSON, or not a rule object / array of rule objects.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// No valid business group was given as the import target.
    #[error("invalid business group id {0}")]
    InvalidGroup(i64),

    /// The batch references more than one non-host category.
    #[error("batch mixes datasource categories: {}", join_categories(.categories))]
    CategoryConflict { categories: Vec<Category> },

    /// No category could be inferred and none was chosen.
    #[error("no datasource category could be inferred; choose one explicitly")]
    CategoryUnresolved,

    /// The chosen category disagrees with the one inferred from the batch.
    #[error("chosen category '{chosen}' does not match inferred category '{inferred}'")]
    CategoryMismatch { inferred: Category, chosen: Category },

    /// The category is not an alert-capable option of the destination.
    #[error("category '{category}' does not support alert rules{}", suggestion_suffix(.suggestion))]
    UnsupportedCategory {
        category: Category,
        suggestion: Option<String>,
    },

    /// Two override entries share a merge key but carry different values.
    #[error("conflicting override values for parameters [{key}]")]
    ConflictingOverride { key: MergeKey },

    /// Structural validation of the batch failed.
    #[error("invalid batch: {}", summarize(.errors))]
    InvalidBatch { errors: Vec<ValidationError> },

    /// The attempt was cancelled before the batch was submitted.
    #[error("import cancelled before submission")]
    Cancelled,

    /// The remote batch-create call itself failed.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Result alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        ImportError::MalformedPayload(e.to_string())
    }
}

fn join_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(Category::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
