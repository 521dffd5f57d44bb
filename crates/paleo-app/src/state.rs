use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use paleo_config::Config;
use paleo_core::Assembler;
use paleo_gemini::GeminiTranscriber;
use paleo_io::Fetcher;
use paleo_transcriber::Transcriber;
use tokio_util::sync::CancellationToken;

pub struct AppState {
    pub config: Config,
    pub fetcher: Fetcher,
    pub transcriber: Arc<dyn Transcriber>,
    pub assembler: Assembler,
    pub cancel: CancellationToken,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let transcriber: Arc<dyn Transcriber> = match config.transcriber.provider.as_str() {
            "gemini" => Arc::new(
                GeminiTranscriber::new(
                    config.transcriber.clone(),
                    config.iiif.reduced_size.clone(),
                )
                .context("failed to initialize Gemini transcriber")?,
            ),
            other => anyhow::bail!("unknown transcription provider '{other}'"),
        };

        let metadata = transcriber.metadata();
        if metadata.requires_api_key && config.transcriber.api_key.is_empty() {
            tracing::warn!("{} needs an API key; set GEMINI_KEY", metadata.name);
        }

        Self::with_transcriber(config, transcriber)
    }

    /// State around an already built transcriber
    pub fn with_transcriber(
        config: Config,
        transcriber: Arc<dyn Transcriber>,
    ) -> anyhow::Result<Self> {
        let fetcher = Fetcher::new(Duration::from_secs(config.transcriber.timeout_seconds))
            .context("failed to build HTTP client")?;
        let assembler = Assembler::new(&transcriber.metadata().model, &config.annotation);

        Ok(Self {
            config,
            fetcher,
            transcriber,
            assembler,
            cancel: CancellationToken::new(),
        })
    }
}
