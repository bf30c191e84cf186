//! Payload normalizer: raw import text into an ordered list of rule records.
//!
//! Exports arrive either as a single rule object or as an array of rule
//! objects. Both decode through [`RawPayload`] and leave this module as the
//! same canonical `Vec<RuleRecord>`; later stages never look at the shape.

use serde_json::Value;
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::schema::{json_kind, RuleRecord};

/// Top-level shape of an import payload.
#[derive(Debug)]
enum RawPayload {
    One(Value),
    Many(Vec<Value>),
}

impl RawPayload {
    fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(ImportError::MalformedPayload("payload is empty".to_string()));
        }
        match serde_json::from_str::<Value>(raw)? {
            Value::Array(items) => Ok(RawPayload::Many(items)),
            obj @ Value::Object(_) => Ok(RawPayload::One(obj)),
            other => Err(ImportError::MalformedPayload(format!(
                "expected a rule object or an array of rule objects, found {}",
                json_kind(&other)
            ))),
        }
    }

    fn into_items(self) -> Vec<Value> {
        match self {
            RawPayload::One(item) => vec![item],
            RawPayload::Many(items) => items,
        }
    }
}

/// Parse raw import text into rule records, preserving input order.
///
/// A single object is treated exactly like a one-element array. Fails with
/// [`ImportError::MalformedPayload`] when the text is not JSON, when any item
/// is not an object or does not fit the rule shape, or when there is nothing
/// to import.
pub fn normalize(raw: &str) -> Result<Vec<RuleRecord>> {
    let items = RawPayload::parse(raw)?.into_items();
    if items.is_empty() {
        return Err(ImportError::MalformedPayload(
            "payload contains no rule definitions".to_string(),
        ));
    }

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(ImportError::MalformedPayload(format!(
                "item {} is {}, expected a rule object",
                index,
                json_kind(&item)
            )));
        }
        let record: RuleRecord = serde_json::from_value(item)
            .map_err(|e| ImportError::MalformedPayload(format!("item {}: {}", index, e)))?;
        records.push(record);
    }

    debug!(records = records.len(), "normalized import payload");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULE: &str = r#"{"name":"cpu","cate":"prometheus","rule_config":{"queries":[{"var_enabled":true,"var_config":{"param_val":[{"id":1,"name":"host"}]}}]}}"#;

    #[test]
    fn single_object_equals_one_element_array() {
        let single = normalize(RULE).unwrap();
        let array = normalize(&format!("[{}]", RULE)).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single, array);
    }

    #[test]
    fn preserves_input_order() {
        let raw = r#"[{"name":"a"},{"name":"b"},{"name":"c"}]"#;
        let names: Vec<_> = normalize(raw)
            .unwrap()
            .iter()
            .map(|r| r.name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = normalize("{not json").unwrap_err();
        assert!(matches!(err, ImportError::MalformedPayload(_)));
    }

    #[test]
    fn scalar_is_malformed() {
        let err = normalize("42").unwrap_err();
        match err {
            ImportError::MalformedPayload(msg) => assert!(msg.contains("a number")),
            other => panic!("expected MalformedPayload, got: {other:?}"),
        }
    }

    #[test]
    fn non_object_item_is_malformed() {
        let err = normalize(r#"[{"name":"a"}, "b"]"#).unwrap_err();
        match err {
            ImportError::MalformedPayload(msg) => assert!(msg.contains("item 1")),
            other => panic!("expected MalformedPayload, got: {other:?}"),
        }
    }

    #[test]
    fn badly_shaped_item_reports_index() {
        let raw = r#"[{"name":"ok"}, {"rule_config":{"queries":"nope"}}]"#;
        match normalize(raw).unwrap_err() {
            ImportError::MalformedPayload(msg) => assert!(msg.starts_with("item 1:")),
            other => panic!("expected MalformedPayload, got: {other:?}"),
        }
    }

    #[test]
    fn empty_inputs_are_malformed() {
        assert!(matches!(normalize("   ").unwrap_err(), ImportError::MalformedPayload(_)));
        assert!(matches!(normalize("[]").unwrap_err(), ImportError::MalformedPayload(_)));
    }
}
