use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::manifest::ImageResource;

fn annotation_type() -> String {
    "Annotation".to_string()
}

fn page_type() -> String {
    "AnnotationPage".to_string()
}

fn textual_body_type() -> String {
    "TextualBody".to_string()
}

fn choice_type() -> String {
    "Choice".to_string()
}

fn software_type() -> String {
    "Software".to_string()
}

/// W3C / IIIF annotation motivations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Motivation {
    Painting,
    Supplementing,
    Transcribing,
    Commenting,
    Tagging,
    Describing,
    Classifying,
    Highlighting,
    Identifying,
    Linking,
    Bookmarking,
    Editing,
    Moderating,
    Questioning,
    Replying,
    Assessing,
    /// Any motivation outside the W3C and IIIF vocabularies
    #[serde(untagged)]
    Other(String),
}

/// A property that holds either a single value or an array of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => std::slice::from_ref(value),
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPage {
    pub id: String,
    #[serde(rename = "type", default = "page_type")]
    pub kind: String,
    #[serde(default)]
    pub items: Vec<Annotation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnnotationPage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: page_type(),
            items: Vec::new(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    #[serde(rename = "type", default = "annotation_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motivation: Option<OneOrMany<Motivation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<OneOrMany<Body>>,
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<AgentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<AgentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Annotation {
    pub fn new(id: impl Into<String>, motivation: Motivation, body: Body, target: Target) -> Self {
        Self {
            id: id.into(),
            kind: annotation_type(),
            motivation: Some(motivation.into()),
            body: Some(body.into()),
            target,
            creator: None,
            created: None,
            generator: None,
            generated: None,
            extra: Map::new(),
        }
    }

    pub fn has_motivation(&self, motivation: &Motivation) -> bool {
        self.motivation
            .as_ref()
            .is_some_and(|m| m.as_slice().contains(motivation))
    }

    /// Bodies in document order; empty when the annotation has none
    pub fn bodies(&self) -> &[Body] {
        self.body.as_ref().map_or(&[], OneOrMany::as_slice)
    }
}

/// Annotation body.
///
/// Variants are tried in order: `Choice` needs `items`, `TextualBody` needs
/// `value`, anything else with an `id` is an image. Bodies matching none of
/// these are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    Choice(Choice),
    TextualBody(TextualBody),
    Image(ImageResource),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(rename = "type", default = "choice_type")]
    pub kind: String,
    pub items: Vec<Body>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextualBody {
    #[serde(rename = "type", default = "textual_body_type")]
    pub kind: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<Motivation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextualBody {
    pub fn new(value: impl Into<String>, format: &str, language: &str) -> Self {
        Self {
            kind: textual_body_type(),
            value: value.into(),
            format: Some(format.to_string()),
            language: Some(language.to_string()),
            purpose: None,
            extra: Map::new(),
        }
    }

    pub fn with_purpose(mut self, purpose: Motivation) -> Self {
        self.purpose = Some(purpose);
        self
    }
}

/// Annotation target: a bare URI (optionally with a fragment selector) or
/// a structured specific resource kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Uri(String),
    Resource(Value),
}

impl Target {
    pub fn canvas(canvas_id: &str) -> Self {
        Target::Uri(canvas_id.to_string())
    }

    pub fn region(canvas_id: &str, region: Region) -> Self {
        Target::Uri(format!("{canvas_id}#{region}"))
    }

    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Target::Uri(uri) => Some(uri),
            Target::Resource(_) => None,
        }
    }
}

/// Pixel region on a canvas, rendered as a media fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Region {
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x.saturating_add(self.w) <= width && self.y.saturating_add(self.h) <= height
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "xywh={},{},{},{}", self.x, self.y, self.w, self.h)
    }
}

/// Creator or generator of an annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "type", default = "software_type")]
    pub kind: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Agent {
    pub fn software(name: impl Into<String>) -> Self {
        Self {
            kind: software_type(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// `creator` / `generator` value: a named agent, or a bare URI or other
/// shape kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgentRef {
    Agent(Agent),
    Other(Value),
}

impl AgentRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            AgentRef::Agent(agent) => Some(&agent.name),
            AgentRef::Other(_) => None,
        }
    }
}

impl From<Agent> for AgentRef {
    fn from(agent: Agent) -> Self {
        AgentRef::Agent(agent)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_region_target_uses_media_fragment() {
        let region = Region {
            x: 10,
            y: 20,
            w: 30,
            h: 40,
        };
        let target = Target::region("https://example.org/canvas/1", region);
        assert_eq!(
            target.as_uri(),
            Some("https://example.org/canvas/1#xywh=10,20,30,40")
        );
    }

    #[test]
    fn test_region_bounds() {
        let region = Region {
            x: 90,
            y: 0,
            w: 10,
            h: 50,
        };
        assert!(region.fits_within(100, 50));
        assert!(!region.fits_within(99, 50));
    }

    #[test]
    fn test_textual_body_round_trips_through_untagged_body() {
        let body = Body::TextualBody(
            TextualBody::new("Dear Sir", "text/plain", "en").with_purpose(Motivation::Transcribing),
        );
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "TextualBody");
        assert_eq!(json["purpose"], "transcribing");

        let parsed: Body = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, body);
    }

    #[test]
    fn test_structured_target_is_kept() {
        let value = json!({
            "id": "https://example.org/anno/1",
            "type": "Annotation",
            "motivation": "commenting",
            "body": { "type": "TextualBody", "value": "note" },
            "target": {
                "type": "SpecificResource",
                "source": "https://example.org/canvas/1"
            }
        });
        let annotation: Annotation = serde_json::from_value(value.clone()).unwrap();
        assert!(matches!(annotation.target, Target::Resource(_)));
        assert!(annotation.has_motivation(&Motivation::Commenting));
        assert_eq!(serde_json::to_value(&annotation).unwrap(), value);
    }

    fn round_trip(value: Value) -> Annotation {
        let annotation: Annotation = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&annotation).unwrap(), value);
        annotation
    }

    #[test]
    fn test_motivation_array_and_unknown_values() {
        let annotation = round_trip(json!({
            "id": "https://example.org/anno/2",
            "type": "Annotation",
            "motivation": ["commenting", "oa:tagging"],
            "body": { "type": "TextualBody", "value": "note" },
            "target": "https://example.org/canvas/1"
        }));

        assert!(annotation.has_motivation(&Motivation::Commenting));
        assert!(annotation.has_motivation(&Motivation::Other("oa:tagging".into())));
        assert!(!annotation.has_motivation(&Motivation::Painting));
    }

    #[test]
    fn test_body_array() {
        let annotation = round_trip(json!({
            "id": "https://example.org/anno/3",
            "type": "Annotation",
            "motivation": "tagging",
            "body": [
                { "type": "TextualBody", "value": "letter", "purpose": "tagging" },
                { "id": "https://example.org/tags/1", "type": "SpecificResource" },
                { "type": "SpecificResource", "source": "https://example.org/tags/2" }
            ],
            "target": "https://example.org/canvas/1"
        }));

        let bodies = annotation.bodies();
        assert_eq!(bodies.len(), 3);
        assert!(matches!(&bodies[0], Body::TextualBody(b) if b.value == "letter"));
        assert!(matches!(&bodies[2], Body::Other(_)));
    }

    #[test]
    fn test_annotation_without_body() {
        let annotation = round_trip(json!({
            "id": "https://example.org/anno/4",
            "type": "Annotation",
            "motivation": "bookmarking",
            "target": "https://example.org/canvas/1"
        }));
        assert!(annotation.bodies().is_empty());
    }

    #[test]
    fn test_creator_as_uri_or_object() {
        let annotation = round_trip(json!({
            "id": "https://example.org/anno/5",
            "type": "Annotation",
            "motivation": "commenting",
            "body": { "type": "TextualBody", "value": "note", "id": "https://example.org/body/5" },
            "target": "https://example.org/canvas/1",
            "creator": "https://orcid.org/0000-0002-1825-0097",
            "generator": {
                "id": "https://example.org/tools/htr",
                "type": "Software",
                "name": "htr"
            }
        }));

        assert!(matches!(&annotation.creator, Some(AgentRef::Other(Value::String(_)))));
        assert_eq!(annotation.generator.as_ref().and_then(AgentRef::name), Some("htr"));
    }
}
