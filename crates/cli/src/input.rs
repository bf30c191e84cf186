//! Reading payloads and JSON arguments from the command line.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use ruleport_rules::overrides::{OverrideEntry, OverrideField};

/// Read the export file, or stdin when the path is `-`.
pub fn read_payload(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read rules from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Inline JSON text, or `@path` naming a JSON file.
pub fn parse_json_arg(arg: &str) -> Result<Value> {
    let text = match arg.strip_prefix('@') {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?
        }
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("argument is not valid JSON")
}

pub fn parse_overrides(arg: &str) -> Result<Vec<OverrideEntry>> {
    let value = parse_json_arg(arg)?;
    serde_json::from_value(value).context("overrides must be a list of {param_val_ids, query} objects")
}

/// Seed entries from the exported values. Explicit entries win per key, and
/// among fields sharing a key the first one is kept.
pub fn with_initial_values(
    fields: &[OverrideField],
    explicit: Vec<OverrideEntry>,
) -> Vec<OverrideEntry> {
    let mut entries: Vec<OverrideEntry> = Vec::with_capacity(fields.len() + explicit.len());
    for field in fields {
        let taken = explicit.iter().chain(entries.iter()).any(|e| e.key == field.key);
        if !taken {
            entries.push(field.to_entry());
        }
    }
    entries.extend(explicit);
    entries
}
