//! Serde types for exported alert-rule definitions.
//!
//! Defines the canonical shape every import stage works on:
//! - `RuleRecord`: one alert rule, with unknown fields carried through verbatim
//! - `Query` / `VarConfig` / `Param`: the nested runtime parameter structures
//! - `Category` / `CategoryCatalog`: datasource category tags and the set of
//!   categories the destination accepts for alert rules
//!
//! Decoding is schema-tolerant: missing or `null` collections become empty,
//! parameter ids may be numbers or strings, and parameter values may be a
//! single whitespace-separated string or a list.

mod category;
mod query;
mod record;
mod values;

pub use category::*;
pub use query::*;
pub use record::*;
pub use values::tokenize;

pub(crate) use values::{deserialize_query_values, json_kind, null_as_default};
