//! `generateContent` wire types.

use paleo_transcriber::TranscribeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Option<Vec<Part>>,
}

impl Content {
    pub fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: Some(vec![Part::text(text)]),
        }
    }

    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: Some(parts),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    /// Set on reasoning-trace parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn inline(mime_type: &str, data: String) -> Self {
        Self {
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 payload
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub include_thoughts: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Reasoning trace and final answer of one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub thought: String,
    pub answer: String,
}

/// Split the first candidate into thought and answer.
///
/// Several parts of the same kind are concatenated in order. A reply
/// without thoughts has an empty `thought`; a reply without an answer is
/// malformed.
pub fn parse_reply(response: GenerateContentResponse) -> Result<Reply, TranscribeError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let feedback = response
            .prompt_feedback
            .map(|f| format!(" (prompt feedback: {f})"))
            .unwrap_or_default();
        return Err(TranscribeError::MalformedResponse(format!(
            "no candidates in response{feedback}"
        )));
    };

    let finish = candidate
        .finish_reason
        .as_deref()
        .map(|reason| format!(" (finish reason {reason})"))
        .unwrap_or_default();

    let content = candidate.content.ok_or_else(|| {
        TranscribeError::MalformedResponse(format!("no content in response candidate{finish}"))
    })?;

    let parts = content
        .parts
        .filter(|parts| !parts.is_empty())
        .ok_or_else(|| {
            TranscribeError::MalformedResponse(format!("no parts in response content{finish}"))
        })?;

    let mut thoughts = Vec::new();
    let mut answers = Vec::new();
    for part in parts {
        let Some(text) = part.text else { continue };
        if part.thought.unwrap_or(false) {
            thoughts.push(text);
        } else {
            answers.push(text);
        }
    }

    if answers.is_empty() {
        return Err(TranscribeError::MalformedResponse(format!(
            "no final answer part in response{finish}"
        )));
    }

    Ok(Reply {
        thought: thoughts.join("\n\n"),
        answer: answers.concat(),
    })
}
