//! Remote rule sink trait definition and shared error types.

use super::RuleSubmission;
use crate::report::BatchResult;

/// Errors from the remote batch-create call as a whole.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rule service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("rule service rejected the batch: {0}")]
    Remote(String),

    #[error("failed to decode rule service response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Destination that creates alert rules in one business group.
#[async_trait::async_trait]
pub trait RuleSink: Send + Sync {
    /// Create every rule of the batch in one call and report per-item results.
    async fn create_batch(
        &self,
        group_id: i64,
        rules: &[RuleSubmission],
    ) -> Result<BatchResult, SinkError>;

    /// Human-readable name for logs (e.g., "http").
    fn sink_name(&self) -> &str;
}
