//! Category consistency: infer the single datasource category of a batch.

use serde::Serialize;
use tracing::{debug, warn};

use super::fuzzy::fuzzy_match;
use crate::error::{ImportError, Result};
use crate::schema::{Category, CategoryCatalog, RuleRecord};

/// Outcome of inspecting the categories of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum CategoryCheck {
    /// Exactly one non-host category; it becomes the import target.
    Inferred(Category),
    /// More than one non-host category, in first-seen order.
    Conflict(Vec<Category>),
    /// No non-host category present; the caller has to choose one.
    Unresolved,
}

impl CategoryCheck {
    /// Only a conflict blocks submission. `Unresolved` is allowed pending
    /// an explicit choice.
    pub fn allows_submit(&self) -> bool {
        !matches!(self, CategoryCheck::Conflict(_))
    }

    pub fn inferred(&self) -> Option<&Category> {
        match self {
            CategoryCheck::Inferred(c) => Some(c),
            _ => None,
        }
    }
}

/// Collect the distinct non-host categories of a batch.
///
/// Host records and records without a `cate` never constrain inference.
pub fn check_categories(records: &[RuleRecord]) -> CategoryCheck {
    let mut seen: Vec<Category> = Vec::new();
    for cate in records.iter().filter_map(|r| r.cate.as_ref()) {
        if cate.is_host() || seen.contains(cate) {
            continue;
        }
        seen.push(cate.clone());
    }

    match seen.len() {
        0 => CategoryCheck::Unresolved,
        1 => CategoryCheck::Inferred(seen.remove(0)),
        _ => CategoryCheck::Conflict(seen),
    }
}

/// Decide the category stamped on every non-host record.
///
/// Returns `Ok(None)` when the batch holds only host records and no category
/// was chosen: there is nothing to stamp.
pub fn resolve_category(
    records: &[RuleRecord],
    chosen: Option<&Category>,
    catalog: &CategoryCatalog,
) -> Result<Option<Category>> {
    let needs_target = records.iter().any(|r| !r.is_host());

    let resolved = match check_categories(records) {
        CategoryCheck::Inferred(inferred) => match chosen {
            Some(chosen) if chosen != &inferred => {
                return Err(ImportError::CategoryMismatch {
                    inferred,
                    chosen: chosen.clone(),
                });
            }
            _ => inferred,
        },
        CategoryCheck::Conflict(categories) => {
            warn!(categories = ?categories, "batch rejected: mixed datasource categories");
            return Err(ImportError::CategoryConflict { categories });
        }
        CategoryCheck::Unresolved => match chosen {
            Some(chosen) => chosen.clone(),
            None if !needs_target => return Ok(None),
            None => return Err(ImportError::CategoryUnresolved),
        },
    };

    if !catalog.accepts(&resolved) {
        let candidates: Vec<&str> = catalog.alert_capable().map(|o| o.value.as_str()).collect();
        let suggestion = fuzzy_match(resolved.as_str(), &candidates).map(str::to_string);
        return Err(ImportError::UnsupportedCategory {
            category: resolved,
            suggestion,
        });
    }

    debug!(category = %resolved, "resolved import category");
    Ok(Some(resolved))
}
