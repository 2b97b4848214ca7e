//! Narrator configuration.

use std::collections::BTreeMap;

/// Configuration for the narrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarratorConfig {
    /// Result templates that replace or extend the built-in ones, by key.
    pub templates: BTreeMap<String, String>,
    /// List furniture status in verbose location descriptions.
    pub show_furniture: bool,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            templates: BTreeMap::new(),
            show_furniture: true,
        }
    }
}

impl NarratorConfig {
    /// Create a new narrator config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override or add a result template.
    pub fn with_template(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(key.into(), text.into());
        self
    }

    /// Show or hide furniture status lines.
    pub fn with_furniture(mut self, show: bool) -> Self {
        self.show_furniture = show;
        self
    }
}
