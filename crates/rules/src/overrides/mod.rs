//! Runtime parameter overrides.
//!
//! Extraction lists the parameter groups a caller may override; merging
//! writes the caller's values back into every parameter of the batch. Both
//! sides meet on a structured [`MergeKey`] (the ordered parameter ids of one
//! variable config), never on position.

mod extract;
mod key;
mod merge;


use serde::{Deserialize, Serialize};

use crate::schema::deserialize_query_values;

pub use extract::{extract_overrides, OverrideField};
pub use key::MergeKey;
pub use merge::{merge_overrides, MergeStats};

/// Caller-supplied values for one parameter group.
///
/// `query` accepts a list of values or a single whitespace-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
    #[serde(rename = "param_val_ids", alias = "paramValIds")]
    pub key: MergeKey,
    #[serde(default, deserialize_with = "deserialize_query_values")]
    pub query: Vec<String>,
}

impl OverrideEntry {
    pub fn new(key: MergeKey, query: Vec<String>) -> Self {
        Self { key, query }
    }
}
