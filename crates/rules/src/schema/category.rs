//! Datasource category tags and the catalog of alert-capable categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Datasource category a rule queries against (e.g. `prometheus`).
///
/// The sentinel [`Category::HOST`] marks rules not tied to an external
/// datasource; those keep their category through an import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const HOST: &'static str = "host";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn host() -> Self {
        Self(Self::HOST.to_string())
    }

    pub fn is_host(&self) -> bool {
        self.0 == Self::HOST
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One datasource category option offered by the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasourceCateOption {
    pub value: Category,
    pub label: String,
    /// Whether datasources of this category can back alert rules.
    #[serde(default)]
    pub alert_rule: bool,
}

/// Category options known to the destination.
///
/// Only options flagged `alert_rule` are valid import targets. An empty
/// catalog accepts any category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryCatalog {
    options: Vec<DatasourceCateOption>,
}

impl CategoryCatalog {
    pub fn new(options: Vec<DatasourceCateOption>) -> Self {
        Self { options }
    }

    /// Build a catalog where every listed category supports alert rules.
    pub fn from_alert_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let options = categories
            .into_iter()
            .map(|c| DatasourceCateOption {
                value: Category::new(c.as_ref()),
                label: c.as_ref().to_string(),
                alert_rule: true,
            })
            .collect();
        Self { options }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Options that can be chosen as an import target.
    pub fn alert_capable(&self) -> impl Iterator<Item = &DatasourceCateOption> {
        self.options.iter().filter(|o| o.alert_rule)
    }

    pub fn accepts(&self, category: &Category) -> bool {
        self.is_empty() || self.alert_capable().any(|o| &o.value == category)
    }
}
