//! HTTP rule sink for the destination's alert-rule API.
//!
//! Posts the batch as a JSON array to
//! `{base_url}/api/n9e/busi-group/{group_id}/alert-rules` and reads the
//! `{"dat": {key: message}, "err": ""}` response envelope.

use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use ruleport_core::RemoteConfig;

use super::{RuleSink, RuleSubmission, SinkError};
use crate::report::BatchResult;

/// Response envelope of the rule service.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    dat: Option<IndexMap<String, Value>>,
    #[serde(default)]
    err: String,
}

/// Creates rules through the destination's REST API.
#[derive(Debug)]
pub struct HttpRuleSink {
    /// Base URL without trailing slash.
    base_url: String,
    /// Bearer token sent on every request, if configured.
    api_token: Option<String>,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl HttpRuleSink {
    pub fn new(
        base_url: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SinkError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SinkError::Config("rule service URL is empty".to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            api_token,
            client,
        })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, SinkError> {
        Self::new(&config.base_url, config.api_token.clone(), config.timeout())
    }

    fn batch_url(&self, group_id: i64) -> String {
        format!("{}/api/n9e/busi-group/{}/alert-rules", self.base_url, group_id)
    }
}

#[async_trait::async_trait]
impl RuleSink for HttpRuleSink {
    async fn create_batch(
        &self,
        group_id: i64,
        rules: &[RuleSubmission],
    ) -> Result<BatchResult, SinkError> {
        let url = self.batch_url(group_id);
        let mut request = self.client.post(&url).json(rules);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(url = %url, %status, body = %body, "rule service returned non-2xx status");
            return Err(SinkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| SinkError::Decode(e.to_string()))?;
        if !envelope.err.is_empty() {
            return Err(SinkError::Remote(envelope.err));
        }

        let result: BatchResult = envelope
            .dat
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, message_text(value)))
            .collect();

        tracing::debug!(url = %url, items = rules.len(), "batch delivered to rule service");
        Ok(result)
    }

    fn sink_name(&self) -> &str {
        "http"
    }
}

/// Per-item messages are strings; `null` means success.
fn message_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_url_trims_trailing_slash() {
        let sink = HttpRuleSink::new("http://n9e.local:17000/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(
            sink.batch_url(3),
            "http://n9e.local:17000/api/n9e/busi-group/3/alert-rules"
        );
    }

    #[test]
    fn empty_url_is_config_error() {
        let err = HttpRuleSink::new("/", None, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, SinkError::Config(_)));
    }

    #[test]
    fn message_text_handles_non_strings() {
        assert_eq!(message_text(Value::Null), "");
        assert_eq!(message_text(Value::String("dup".into())), "dup");
        assert_eq!(message_text(serde_json::json!(5)), "5");
    }

    #[test]
    fn sink_name_is_http() {
        let sink = HttpRuleSink::new("http://localhost", None, Duration::from_secs(1)).unwrap();
        assert_eq!(sink.sink_name(), "http");
    }
}
