//! Result aggregation for a submitted batch.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Per-item outcome returned by the remote batch-create call.
///
/// Maps an item key (its position or name) to an error message. An empty
/// message means the item was created. Response order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchResult(IndexMap<String, String>);

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for BatchResult {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Overall status of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Success,
    PartialOrTotalFailure,
}

/// One item the remote side refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub key: String,
    pub message: String,
}

/// Aggregated outcome of one import attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub status: ImportStatus,
    /// Items reported with an empty message.
    pub succeeded: usize,
    /// Items reported with a non-empty message, in response order.
    pub failures: Vec<ItemFailure>,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.status == ImportStatus::Success
    }
}

/// Interpret a [`BatchResult`]. Any non-empty message fails its item.
pub fn aggregate(result: &BatchResult) -> ImportReport {
    let mut succeeded = 0;
    let mut failures = Vec::new();

    for (key, message) in result.iter() {
        if message.is_empty() {
            succeeded += 1;
        } else {
            failures.push(ItemFailure {
                key: key.to_string(),
                message: message.to_string(),
            });
        }
    }

    let status = if failures.is_empty() {
        info!(succeeded, "batch import succeeded");
        ImportStatus::Success
    } else {
        for failure in &failures {
            warn!(item = %failure.key, error = %failure.message, "rule import failed");
        }
        ImportStatus::PartialOrTotalFailure
    };

    ImportReport {
        status,
        succeeded,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_name_scenario() {
        let result: BatchResult = serde_json::from_str(r#"{"0": "", "1": "duplicate name"}"#).unwrap();
        let report = aggregate(&result);

        assert_eq!(report.status, ImportStatus::PartialOrTotalFailure);
        assert_eq!(report.succeeded, 1);
        assert_eq!(
            report.failures,
            vec![ItemFailure {
                key: "1".into(),
                message: "duplicate name".into()
            }]
        );
    }

    #[test]
    fn all_empty_is_success() {
        let result: BatchResult = [("0", ""), ("1", ""), ("2", "")].into_iter().collect();
        let report = aggregate(&result);
        assert!(report.is_success());
        assert_eq!(report.succeeded, 3);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn empty_result_is_success() {
        let report = aggregate(&BatchResult::new());
        assert!(report.is_success());
        assert_eq!(report.succeeded, 0);
    }

    #[test]
    fn failures_keep_response_order() {
        let result: BatchResult =
            serde_json::from_str(r#"{"cpu high": "exists", "disk": "", "mem": "bad query"}"#).unwrap();
        let report = aggregate(&result);
        let keys: Vec<_> = report.failures.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["cpu high", "mem"]);
    }

    #[test]
    fn total_failure_uses_same_status() {
        let result: BatchResult = [("0", "boom")].into_iter().collect();
        assert_eq!(aggregate(&result).status, ImportStatus::PartialOrTotalFailure);
    }
}
