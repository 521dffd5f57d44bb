use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::annotation::AnnotationConfig;
use self::iiif::IiifConfig;
use self::log::LogConfig;
use self::transcriber::TranscriberConfig;

pub mod annotation;
pub mod iiif;
pub mod log;
pub mod transcriber;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Runtime configuration.
///
/// Layers, lowest first: built-in defaults, optional JSON file, environment.
/// CLI flags are applied on top by the binary.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub transcriber: TranscriberConfig,
    pub annotation: AnnotationConfig,
    pub iiif: IiifConfig,
    pub log: LogConfig,
}

impl Config {
    /// Defaults with environment overrides
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Read a JSON config file; missing sections fall back to defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| env::var(key).ok());
    }

    /// Apply overrides from a variable lookup; empty values are ignored
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = var("GEMINI_KEY") {
            self.transcriber.api_key = api_key;
        }

        if let Some(model) = var("PALEO_MODEL") {
            self.transcriber.model = model;
        }

        if let Some(api_url) = var("PALEO_API_URL") {
            self.transcriber.api_url = api_url;
        }

        if let Some(path) = var("PALEO_PROMPT") {
            self.transcriber.prompt_path = Some(path);
        }

        if let Some(path) = var("PALEO_COORDINATE_PROMPT") {
            self.transcriber.coordinate_prompt_path = Some(path);
        }

        if let Some(timeout) = var("PALEO_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.transcriber.timeout_seconds = timeout;
        }

        if let Some(template) = var("PALEO_MANIFEST_TEMPLATE") {
            self.iiif.manifest_template = Some(template);
        }
    }
}
