use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranscriptionMode {
    /// One transcript for the whole canvas
    #[default]
    WholeCanvas,
    /// Word-level boxes with pixel offsets
    Coordinates,
}

/// One recognised word and its box, in the pixel space of the image that
/// was sent for transcription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    pub raw: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transcript {
    Text(String),
    Words(Vec<WordBox>),
    /// Coordinate output that could not be decoded; callers must not treat
    /// this as a transcript
    Undecodable { error: String, raw: String },
}

impl Transcript {
    /// Readable text of the transcript, words joined by spaces
    pub fn plain_text(&self) -> Option<String> {
        match self {
            Transcript::Text(text) => Some(text.clone()),
            Transcript::Words(words) => Some(
                words
                    .iter()
                    .map(|word| word.raw.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Transcript::Undecodable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    pub transcript: Transcript,
    /// Model reasoning trace, may be empty
    pub rationale: String,
    /// Pixel size of the image the model saw, when known
    pub source_size: Option<(u32, u32)>,
}

impl TranscriptionResult {
    pub fn text(transcript: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            transcript: Transcript::Text(transcript.into()),
            rationale: rationale.into(),
            source_size: None,
        }
    }

    pub fn words(words: Vec<WordBox>, rationale: impl Into<String>) -> Self {
        Self {
            transcript: Transcript::Words(words),
            rationale: rationale.into(),
            source_size: None,
        }
    }

    pub fn with_source_size(mut self, width: u32, height: u32) -> Self {
        self.source_size = Some((width, height));
        self
    }
}
