//! Batch submitter: shape merged records for the destination and send them.
//!
//! Submission objects drop the source system's metadata, carry the resolved
//! category, and encode the caller's enabled choice as the destination's
//! inverted `disabled` integer. The batch goes out in exactly one
//! [`RuleSink::create_batch`] call.

mod http;
mod sink;

pub use http::HttpRuleSink;
pub use sink::{RuleSink, SinkError};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::report::BatchResult;
use crate::schema::{Category, RuleConfig, RuleRecord, METADATA_FIELDS};

/// Caller choices stamped onto every submission.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Category for non-host records; `None` keeps each record's own tag.
    pub category: Option<Category>,
    pub enabled: bool,
    /// Datasource selection in the destination. Replaces the exported
    /// `rule_config.datasource_queries`; `None` drops it.
    pub datasource_queries: Option<Value>,
}

/// One rule as sent to the destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cate: Option<Category>,
    /// `0` = enabled, `1` = disabled.
    pub disabled: u8,
    pub rule_config: RuleConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire encoding of the enabled flag.
pub fn disabled_flag(enabled: bool) -> u8 {
    if enabled {
        0
    } else {
        1
    }
}

impl RuleSubmission {
    pub fn from_record(record: RuleRecord, options: &SubmitOptions) -> Self {
        let RuleRecord {
            cate,
            mut rule_config,
            mut extra,
        } = record;

        for field in METADATA_FIELDS {
            extra.remove(*field);
        }
        extra.remove("disabled");

        let cate = match cate {
            Some(c) if c.is_host() => Some(c),
            other => options.category.clone().or(other),
        };
        rule_config.datasource_queries = options.datasource_queries.clone();

        Self {
            cate,
            disabled: disabled_flag(options.enabled),
            rule_config,
            extra,
        }
    }
}

/// Turn merged records into submission objects, preserving order.
pub fn build_submissions(records: Vec<RuleRecord>, options: &SubmitOptions) -> Vec<RuleSubmission> {
    records
        .into_iter()
        .map(|record| RuleSubmission::from_record(record, options))
        .collect()
}

/// Send the whole batch to `group_id` in one call.
pub async fn submit_batch(
    sink: &dyn RuleSink,
    group_id: i64,
    submissions: &[RuleSubmission],
) -> Result<BatchResult, SinkError> {
    info!(
        sink = sink.sink_name(),
        group_id,
        rules = submissions.len(),
        "submitting rule batch"
    );
    sink.create_batch(group_id, submissions).await
}
