//! Tolerant deserializers shared by the schema types.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Split a tag input string into values. Whitespace is the tag separator.
pub fn tokenize(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

/// Deserialize `null` the same way as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Deserialize parameter values from `null`, a tag string, or a list of scalars.
pub(crate) fn deserialize_query_values<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    query_values_from(value.unwrap_or(Value::Null)).map_err(de::Error::custom)
}

fn query_values_from(value: Value) -> Result<Vec<String>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(tokenize(&s)),
        Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) if s.trim().is_empty() => {}
                    Value::String(s) => values.push(s),
                    Value::Number(n) => values.push(n.to_string()),
                    Value::Bool(b) => values.push(b.to_string()),
                    Value::Null => {}
                    other => {
                        return Err(format!(
                            "expected a string value in query list, found {}",
                            json_kind(&other)
                        ))
                    }
                }
            }
            Ok(values)
        }
        other => Err(format!(
            "expected a string or a list of strings, found {}",
            json_kind(&other)
        )),
    }
}

/// Human-readable JSON type name for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
