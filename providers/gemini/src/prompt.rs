use std::fs;

use paleo_config::transcriber::TranscriberConfig;
use paleo_transcriber::TranscribeError;

const HTR_PROMPT: &str = include_str!("../prompts/htr.md");
const COORDINATE_PROMPT: &str = include_str!("../prompts/htr-coordinates.md");
const METADATA_PROMPT: &str = include_str!("../prompts/metadata.md");

/// User turn sent alongside the page image
pub const TRANSCRIBE_INSTRUCTION: &str =
    "Please transcribe the following image according to the established guidelines:";

/// System instructions for each request kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub whole_canvas: String,
    pub coordinates: String,
    pub metadata: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            whole_canvas: HTR_PROMPT.to_string(),
            coordinates: COORDINATE_PROMPT.to_string(),
            metadata: METADATA_PROMPT.to_string(),
        }
    }
}

impl Prompts {
    /// Built-in prompts, replaced by any configured prompt file
    pub fn load(config: &TranscriberConfig) -> Result<Self, TranscribeError> {
        Ok(Self {
            whole_canvas: read_or(config.prompt_path.as_deref(), HTR_PROMPT)?,
            coordinates: read_or(config.coordinate_prompt_path.as_deref(), COORDINATE_PROMPT)?,
            metadata: read_or(config.metadata_prompt_path.as_deref(), METADATA_PROMPT)?,
        })
    }
}

fn read_or(path: Option<&str>, builtin: &str) -> Result<String, TranscribeError> {
    match path {
        Some(path) => {
            tracing::info!("Loading prompt from {path}");
            fs::read_to_string(path).map_err(|source| TranscribeError::PromptError {
                path: path.to_string(),
                source,
            })
        }
        None => Ok(builtin.to_string()),
    }
}
