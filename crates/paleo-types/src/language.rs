use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Language tag used when a value carries no language
pub const NO_LANGUAGE: &str = "none";

/// IIIF v3 language map: `{"en": ["Letter"], "none": ["..."]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageMap(pub BTreeMap<String, Vec<String>>);

impl LanguageMap {
    /// Single value without a language
    pub fn none(value: impl Into<String>) -> Self {
        Self::with(NO_LANGUAGE, value)
    }

    pub fn with(language: impl Into<String>, value: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(language.into(), vec![value.into()]);
        Self(map)
    }

    pub fn push(&mut self, language: impl Into<String>, value: impl Into<String>) {
        self.0.entry(language.into()).or_default().push(value.into());
    }

    /// First value, preferring the untagged entry
    pub fn first(&self) -> Option<&str> {
        self.0
            .get(NO_LANGUAGE)
            .and_then(|values| values.first())
            .or_else(|| self.0.values().find_map(|values| values.first()))
            .map(String::as_str)
    }
}
