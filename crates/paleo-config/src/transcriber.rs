use serde::{Deserialize, Serialize};

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_metadata_temperature() -> f32 {
    0.1
}

fn default_include_thoughts() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    300
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranscriberConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Overrides the built-in whole-canvas prompt
    #[serde(default)]
    pub prompt_path: Option<String>,
    /// Overrides the built-in coordinate prompt
    #[serde(default)]
    pub coordinate_prompt_path: Option<String>,
    /// Overrides the built-in metadata prompt
    #[serde(default)]
    pub metadata_prompt_path: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_metadata_temperature")]
    pub metadata_temperature: f32,
    #[serde(default = "default_include_thoughts")]
    pub include_thoughts: bool,
    /// Per-request timeout, covers image fetches and model calls
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
            prompt_path: None,
            coordinate_prompt_path: None,
            metadata_prompt_path: None,
            temperature: default_temperature(),
            metadata_temperature: default_metadata_temperature(),
            include_thoughts: default_include_thoughts(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
