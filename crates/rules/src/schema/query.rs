//! Rule queries and their runtime parameter configuration.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::{deserialize_query_values, json_kind, null_as_default};

/// Parameter identifier. Exports carry either numeric or string ids.
///
/// Numbers outside the `i64` range and non-integral numbers are kept as
/// [`ParamId::Number`] so they serialize back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ParamId {
    Int(i64),
    Number(Number),
    Text(String),
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamId::Int(n) => write!(f, "{}", n),
            ParamId::Number(n) => write!(f, "{}", n),
            ParamId::Text(s) => f.write_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for ParamId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(ParamId::Text(s)),
            Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => ParamId::Int(i),
                None => ParamId::Number(n),
            }),
            other => Err(de::Error::custom(format!(
                "parameter id must be a number or string, found {}",
                json_kind(&other)
            ))),
        }
    }
}

/// A named runtime-overridable query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub id: ParamId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Resolved override values. Absent in exports; filled by the merge stage.
    #[serde(default, deserialize_with = "deserialize_query_values")]
    pub query: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameter variable configuration of one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VarConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub param_val: Vec<Param>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VarConfig {
    /// Parameter ids in declaration order.
    pub fn param_ids(&self) -> impl Iterator<Item = &ParamId> {
        self.param_val.iter().map(|p| &p.id)
    }
}

/// One query of a rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub var_config: Option<VarConfig>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub var_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource_queries: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Query {
    /// Parameters of this query, empty when it has no variable config.
    pub fn params(&self) -> &[Param] {
        self.var_config
            .as_ref()
            .map(|vc| vc.param_val.as_slice())
            .unwrap_or(&[])
    }
}
