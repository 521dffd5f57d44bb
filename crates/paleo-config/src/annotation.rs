use serde::{Deserialize, Serialize};

fn default_transcript_language() -> String {
    "en".to_string()
}

fn default_rationale_language() -> String {
    "none".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Language tag of transcription bodies
    #[serde(default = "default_transcript_language")]
    pub transcript_language: String,
    /// Language tag of rationale bodies
    #[serde(default = "default_rationale_language")]
    pub rationale_language: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            transcript_language: default_transcript_language(),
            rationale_language: default_rationale_language(),
        }
    }
}
