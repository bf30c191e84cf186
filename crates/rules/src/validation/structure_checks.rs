//! Structural checks on individual records: names and parameter declarations.

use std::collections::HashSet;

use super::ValidationResult;
use crate::schema::RuleRecord;

pub(super) fn validate_record(index: usize, record: &RuleRecord, result: &mut ValidationResult) {
    match record.name() {
        Some(name) if !name.trim().is_empty() => {}
        _ => result.warn(format!("[{}].name", index), "rule has no name"),
    }

    for (q, query) in record.queries().iter().enumerate() {
        let path = format!("[{}].rule_config.queries[{}].var_config.param_val", index, q);
        let params = query.params();

        if query.var_enabled && params.is_empty() {
            result.warn(&path, "variables are enabled but no parameters are declared");
        }

        // Param ids form the merge key and must be unique within one config.
        let mut seen = HashSet::new();
        for (p, param) in params.iter().enumerate() {
            let id = param.id.to_string();
            if !is_label_safe(&id) {
                result.error(
                    format!("{}[{}].id", path, p),
                    format!(
                        "parameter id '{}' cannot be addressed by an override label; ids must be non-empty, without commas or surrounding whitespace",
                        id
                    ),
                );
            }
            if !seen.insert(id.clone()) {
                result.error(
                    format!("{}[{}].id", path, p),
                    format!("duplicate parameter id '{}'", id),
                );
            }
            if param.name.trim().is_empty() {
                result.warn(format!("{}[{}].name", path, p), "parameter has no name");
            }
        }
    }
}

/// Ids are joined with ", " for display and split on ',' when a label is
/// read back, so only ids that survive that round trip are accepted.
fn is_label_safe(id: &str) -> bool {
    !id.is_empty() && !id.contains(',') && id.trim() == id
}

#[cfg(test)]
mod tests {
    use super::super::validate_batch;
    use super::is_label_safe;
    use crate::payload::normalize;

    #[test]
    fn clean_batch_is_valid() {
        let records = normalize(
            r#"[{"name":"cpu","rule_config":{"queries":[{"var_enabled":true,"var_config":{"param_val":[{"id":1,"name":"ident"},{"id":2,"name":"region"}]}}]}}]"#,
        )
        .unwrap();
        let result = validate_batch(&records);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn duplicate_param_ids_are_errors() {
        let records = normalize(
            r#"{"name":"cpu","rule_config":{"queries":[{"var_config":{"param_val":[{"id":1,"name":"a"},{"id":"1","name":"b"}]}}]}}"#,
        )
        .unwrap();
        let result = validate_batch(&records);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].path,
            "[0].rule_config.queries[0].var_config.param_val[1].id"
        );
    }

    #[test]
    fn missing_names_and_empty_params_are_warnings() {
        let records = normalize(
            r#"[{"name":"ok"},{"rule_config":{"queries":[{"var_enabled":true,"var_config":{"param_val":[]}}]}}]"#,
        )
        .unwrap();
        let result = validate_batch(&records);
        assert!(result.valid);
        let paths: Vec<_> = result.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["[1].name", "[1].rule_config.queries[0].var_config.param_val"]
        );
    }

    #[test]
    fn ids_that_break_label_round_trip_are_errors() {
        let records = normalize(
            r#"{"name":"cpu","rule_config":{"queries":[{"var_enabled":true,"var_config":{"param_val":[
              {"id":"a,b","name":"x"},{"id":" c","name":"y"},{"id":"","name":"z"},{"id":"ok-1","name":"w"}
            ]}}]}}"#,
        )
        .unwrap();
        let result = validate_batch(&records);
        assert!(!result.valid);
        let paths: Vec<_> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "[0].rule_config.queries[0].var_config.param_val[0].id",
                "[0].rule_config.queries[0].var_config.param_val[1].id",
                "[0].rule_config.queries[0].var_config.param_val[2].id",
            ]
        );
    }

    #[test]
    fn label_safe_ids() {
        assert!(is_label_safe("1"));
        assert!(is_label_safe("region-2"));
        assert!(is_label_safe("1.5"));
        assert!(!is_label_safe("a,b"));
        assert!(!is_label_safe("a "));
        assert!(!is_label_safe(""));
    }
}
