//! Alert-rule record as exported by the source system.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{null_as_default, Category, Query};

/// Fields owned by the source system. They are never forwarded to the
/// destination on import.
pub const METADATA_FIELDS: &[&str] = &[
    "id",
    "group_id",
    "create_at",
    "create_by",
    "update_at",
    "update_by",
];

/// Query configuration of a rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub queries: Vec<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource_queries: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One alert-rule definition being imported.
///
/// Only `cate` and `rule_config` are interpreted; every other field is kept
/// in `extra` and passed through unchanged (apart from [`METADATA_FIELDS`],
/// which the submitter strips).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cate: Option<Category>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rule_config: RuleConfig,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RuleRecord {
    /// Rule name, if the export carries one.
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }

    pub fn is_host(&self) -> bool {
        self.cate.as_ref().is_some_and(Category::is_host)
    }

    pub fn queries(&self) -> &[Query] {
        &self.rule_config.queries
    }
}
