use std::time::Duration;

use async_trait::async_trait;
use paleo_config::transcriber::TranscriberConfig;
use paleo_core::image_uri;
use paleo_core::preprocess::{Preprocessor, TranscriptPreprocessor};
use paleo_core::toon;
use paleo_core::wordbox::decode_word_boxes;
use paleo_io::Fetcher;
use paleo_transcriber::{ProviderMetadata, TranscribeError, Transcriber};
use paleo_types::{Transcript, TranscriptionMode, TranscriptionResult};

use crate::api::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, Reply,
    ThinkingConfig, parse_reply,
};
use crate::inline::inline_image;
use crate::prompt::{Prompts, TRANSCRIBE_INSTRUCTION};

#[derive(Clone)]
pub struct GeminiTranscriber {
    fetcher: Fetcher,
    config: TranscriberConfig,
    prompts: Prompts,
    /// Image API size requested in coordinate mode
    reduced_size: String,
}

impl GeminiTranscriber {
    pub fn new(config: TranscriberConfig, reduced_size: String) -> Result<Self, TranscribeError> {
        let prompts = Prompts::load(&config)?;
        let fetcher = Fetcher::new(Duration::from_secs(config.timeout_seconds))?;
        Ok(Self::with_parts(config, prompts, fetcher, reduced_size))
    }

    pub fn with_parts(
        config: TranscriberConfig,
        prompts: Prompts,
        fetcher: Fetcher,
        reduced_size: String,
    ) -> Self {
        Self {
            fetcher,
            config,
            prompts,
            reduced_size,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Image actually fetched for `mode`
    fn request_image_ref(&self, image_ref: &str, mode: TranscriptionMode) -> String {
        match mode {
            TranscriptionMode::WholeCanvas => image_ref.to_string(),
            TranscriptionMode::Coordinates => image_uri::with_size(image_ref, &self.reduced_size)
                .unwrap_or_else(|| {
                    tracing::debug!("{image_ref} is not an Image API URL, sending as-is");
                    image_ref.to_string()
                }),
        }
    }

    fn ensure_api_key(&self) -> Result<(), TranscribeError> {
        if self.config.api_key.is_empty() {
            return Err(TranscribeError::AuthenticationError);
        }
        Ok(())
    }

    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, TranscribeError> {
        self.ensure_api_key()?;

        let response = self
            .fetcher
            .client()
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == 429 {
            return Err(TranscribeError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(TranscribeError::AuthenticationError);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(500).collect();
            return Err(TranscribeError::ApiError(format!("HTTP {status}: {snippet}")));
        }

        response.json::<GenerateContentResponse>().await.map_err(|e| {
            TranscribeError::MalformedResponse(format!("Failed to parse response: {e}"))
        })
    }
}

/// Interpret a reply for `mode`; `image_size` is the pixel size of the image
/// that was sent
pub fn transcription_result(
    reply: &Reply,
    mode: TranscriptionMode,
    image_size: (u32, u32),
) -> TranscriptionResult {
    let preprocessor = TranscriptPreprocessor;

    let transcript = match mode {
        TranscriptionMode::WholeCanvas => Transcript::Text(preprocessor.process(&reply.answer)),
        TranscriptionMode::Coordinates => match decode_word_boxes(&reply.answer) {
            Transcript::Words(mut words) => {
                for word in &mut words {
                    word.raw = preprocessor.process(&word.raw);
                }
                Transcript::Words(words)
            }
            other => other,
        },
    };

    TranscriptionResult {
        transcript,
        rationale: reply.thought.trim().to_string(),
        source_size: Some(image_size),
    }
}

#[async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe(
        &self,
        image_ref: &str,
        mode: TranscriptionMode,
    ) -> Result<TranscriptionResult, TranscribeError> {
        self.ensure_api_key()?;

        let image_ref = self.request_image_ref(image_ref, mode);
        let bytes = self.fetcher.bytes(&image_ref).await?;
        let image = inline_image(&image_ref, &bytes)?;
        tracing::debug!(
            "Sending {} ({}x{}, {}) to {}",
            image_ref,
            image.width,
            image.height,
            image.mime_type,
            self.config.model
        );

        let system = match mode {
            TranscriptionMode::WholeCanvas => &self.prompts.whole_canvas,
            TranscriptionMode::Coordinates => &self.prompts.coordinates,
        };

        let request = GenerateContentRequest {
            system_instruction: Content::system(system),
            contents: vec![Content::user(vec![
                Part::text(TRANSCRIBE_INSTRUCTION),
                Part::inline(image.mime_type, image.data),
            ])],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                thinking_config: Some(ThinkingConfig {
                    include_thoughts: self.config.include_thoughts,
                }),
            },
        };

        let reply = parse_reply(self.generate(&request).await?)?;
        Ok(transcription_result(&reply, mode, (image.width, image.height)))
    }

    async fn describe(&self, transcript: &str) -> Result<serde_json::Value, TranscribeError> {
        let request = GenerateContentRequest {
            system_instruction: Content::system(&self.prompts.metadata),
            contents: vec![Content::user(vec![Part::text(&format!(
                "Transcription to analyze:\n\n{transcript}"
            ))])],
            generation_config: GenerationConfig {
                temperature: self.config.metadata_temperature,
                thinking_config: None,
            },
        };

        let reply = parse_reply(self.generate(&request).await?)?;
        toon::decode(&reply.answer)
            .map_err(|e| TranscribeError::UndecodableDescription(e.to_string()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Gemini".to_string(),
            model: self.config.model.clone(),
            requires_api_key: true,
        }
    }
}
