use paleo_io::FetchError;
use paleo_types::{TranscriptionMode, TranscriptionResult};

/// Transcription provider interface
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the image at `image_ref` (URL or local path)
    async fn transcribe(
        &self,
        image_ref: &str,
        mode: TranscriptionMode,
    ) -> Result<TranscriptionResult, TranscribeError>;

    /// Structured description of transcribed text, as a JSON object
    async fn describe(&self, transcript: &str) -> Result<serde_json::Value, TranscribeError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    /// Model identifier recorded as annotation creator
    pub model: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Image fetch failed: {0}")]
    ImageFetch(#[from] FetchError),

    #[error("Unreadable image {image}: {reason}")]
    InvalidImage { image: String, reason: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to read prompt {path}: {source}")]
    PromptError {
        path: String,
        source: std::io::Error,
    },

    #[error("Undecodable description: {0}")]
    UndecodableDescription(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,
}
