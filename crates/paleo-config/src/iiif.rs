use serde::{Deserialize, Serialize};

fn default_thumbnail_size() -> String {
    "!400,400".to_string()
}

fn default_reduced_size() -> String {
    "!2000,2000".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct IiifConfig {
    /// Image API size segment written into thumbnails by vendor stripping
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: String,
    /// Image API size segment requested in coordinate mode
    #[serde(default = "default_reduced_size")]
    pub reduced_size: String,
    /// Expands bare list identifiers, e.g. `https://host/iiif/{id}/manifest`
    #[serde(default)]
    pub manifest_template: Option<String>,
}

impl Default for IiifConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: default_thumbnail_size(),
            reduced_size: default_reduced_size(),
            manifest_template: None,
        }
    }
}

impl IiifConfig {
    /// Resolve a list entry to a manifest reference
    pub fn manifest_ref(&self, identifier: &str) -> String {
        let looks_resolved = identifier.contains("://")
            || identifier.ends_with(".json")
            || identifier.starts_with('/')
            || identifier.starts_with('.');

        match &self.manifest_template {
            Some(template) if !looks_resolved => template.replace("{id}", identifier),
            _ => identifier.to_string(),
        }
    }
}
