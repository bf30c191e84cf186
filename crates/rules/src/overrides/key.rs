//! Structured merge key linking override entries to parameter groups.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::VarConfig;

/// Ordered tuple of the parameter ids of one [`VarConfig`].
///
/// Ids are compared by their canonical string form, so the numeric id `1`
/// and the string id `"1"` match. Keys are never concatenated, which keeps
/// `[1, 23]` and `[12, 3]` distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MergeKey(Vec<String>);

impl MergeKey {
    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self(ids.into_iter().map(|id| id.to_string()).collect())
    }

    /// Key of a variable config: its parameter ids in declaration order.
    pub fn of(var_config: &VarConfig) -> Self {
        Self::from_ids(var_config.param_ids())
    }

    /// Parse the display form (`"1, 2"`). Surrounding whitespace is ignored.
    pub fn parse(label: &str) -> Self {
        Self(
            label
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MergeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl<'de> Deserialize<'de> for MergeKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(label) => Ok(MergeKey::parse(&label)),
            Value::Number(n) => Ok(MergeKey(vec![n.to_string()])),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    Value::Number(n) => Ok(n.to_string()),
                    other => Err(de::Error::custom(format!(
                        "parameter id must be a string or number, found {}",
                        other
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(MergeKey),
            other => Err(de::Error::custom(format!(
                "expected parameter ids as a list or a comma-separated string, found {}",
                other
            ))),
        }
    }
}
