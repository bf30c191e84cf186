//! Override merge: write caller-supplied values into every parameter.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::{MergeKey, OverrideEntry};
use crate::error::{ImportError, Result};
use crate::schema::RuleRecord;

/// Counters from one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Parameters that received override values.
    pub matched: usize,
    /// Parameters reset to an empty value because no entry matched.
    pub cleared: usize,
    /// Entries whose key matched no parameter group.
    pub unused: usize,
}

/// Index entries by key. Duplicate keys must carry identical values.
fn index_entries(entries: &[OverrideEntry]) -> Result<HashMap<&MergeKey, &[String]>> {
    let mut table: HashMap<&MergeKey, &[String]> = HashMap::with_capacity(entries.len());
    for entry in entries {
        match table.get(&entry.key) {
            Some(existing) if *existing != entry.query.as_slice() => {
                return Err(ImportError::ConflictingOverride {
                    key: entry.key.clone(),
                });
            }
            Some(_) => {}
            None => {
                table.insert(&entry.key, entry.query.as_slice());
            }
        }
    }
    Ok(table)
}

/// Rewrite the `query` of every parameter in the batch.
///
/// Each parameter takes the values of the entry whose key equals its
/// variable config's [`MergeKey`]; without a match it is set to an empty
/// list, whatever it held before. Queries with variables disabled are
/// rewritten too and end up empty. Matching is by key, so entry order does
/// not affect the result.
pub fn merge_overrides(records: &mut [RuleRecord], entries: &[OverrideEntry]) -> Result<MergeStats> {
    let table = index_entries(entries)?;
    let mut stats = MergeStats::default();
    let mut used: Vec<&MergeKey> = Vec::new();

    for record in records.iter_mut() {
        for query in record.rule_config.queries.iter_mut() {
            let Some(var_config) = query.var_config.as_mut() else {
                continue;
            };
            let key = MergeKey::of(var_config);
            let values = table.get_key_value(&key);
            if let Some((matched_key, _)) = values {
                if !used.contains(matched_key) {
                    used.push(*matched_key);
                }
            }

            for param in var_config.param_val.iter_mut() {
                match values {
                    Some((_, values)) => {
                        param.query = values.to_vec();
                        stats.matched += 1;
                    }
                    None => {
                        param.query = Vec::new();
                        stats.cleared += 1;
                    }
                }
            }
        }
    }

    stats.unused = table.len() - used.len();
    if stats.unused > 0 {
        let unused: Vec<String> = table
            .keys()
            .filter(|k| !used.contains(*k))
            .map(|k| k.to_string())
            .collect();
        warn!(keys = ?unused, "override entries matched no parameter group");
    }
    debug!(
        matched = stats.matched,
        cleared = stats.cleared,
        unused = stats.unused,
        "merged parameter overrides"
    );
    Ok(stats)
}
