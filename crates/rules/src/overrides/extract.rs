//! Override extraction: which parameters the caller may set, and their labels.

use serde::{Deserialize, Serialize};

use super::{MergeKey, OverrideEntry};
use crate::schema::{tokenize, RuleRecord};

/// One overridable parameter group, projected from a `var_enabled` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideField {
    /// Position of the query among all queries of the batch.
    pub index: usize,
    pub key: MergeKey,
    /// Parameter ids joined for display, e.g. `"1, 2"`.
    pub ids_label: String,
    /// Parameter names joined for display, e.g. `"ident, region"`.
    pub names: String,
    /// Existing parameter values joined with a space; empty when none.
    pub initial: String,
}

impl OverrideField {
    /// Entry that submits the field's initial value unchanged.
    pub fn to_entry(&self) -> OverrideEntry {
        OverrideEntry {
            key: self.key.clone(),
            query: tokenize(&self.initial),
        }
    }
}

/// Project every `var_enabled` query of the batch into an [`OverrideField`].
///
/// Queries with variables disabled are skipped. Does not mutate the records.
pub fn extract_overrides(records: &[RuleRecord]) -> Vec<OverrideField> {
    records
        .iter()
        .flat_map(|record| record.queries())
        .enumerate()
        .filter(|(_, query)| query.var_enabled)
        .map(|(index, query)| {
            let params = query.params();
            let key = query
                .var_config
                .as_ref()
                .map(MergeKey::of)
                .unwrap_or_default();
            let names = params
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let initial = params
                .iter()
                .flat_map(|p| p.query.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ");
            OverrideField {
                index,
                ids_label: key.to_string(),
                key,
                names,
                initial,
            }
        })
        .collect()
}
