use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::annotation::{AnnotationPage, Body};
use crate::language::LanguageMap;

pub const PRESENTATION_3_CONTEXT: &str = "http://iiif.io/api/presentation/3/context.json";

fn default_context() -> Value {
    Value::String(PRESENTATION_3_CONTEXT.to_string())
}

fn manifest_type() -> String {
    "Manifest".to_string()
}

fn canvas_type() -> String {
    "Canvas".to_string()
}

fn image_type() -> String {
    "Image".to_string()
}

/// IIIF Presentation 3 manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "@context", default = "default_context")]
    pub context: Value,
    pub id: String,
    #[serde(rename = "type", default = "manifest_type")]
    pub kind: String,
    #[serde(default)]
    pub label: LanguageMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<MetadataEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thumbnail: Vec<ImageResource>,
    #[serde(default)]
    pub items: Vec<Canvas>,
    /// Properties this model does not interpret, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    pub fn new(id: impl Into<String>, label: LanguageMap) -> Self {
        Self {
            context: default_context(),
            id: id.into(),
            kind: manifest_type(),
            label,
            metadata: Vec::new(),
            thumbnail: Vec::new(),
            items: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Total annotations across every canvas, painting pages excluded
    pub fn annotation_count(&self) -> usize {
        self.items.iter().map(Canvas::annotation_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub label: LanguageMap,
    pub value: LanguageMap,
}

impl MetadataEntry {
    pub fn new(label: LanguageMap, value: LanguageMap) -> Self {
        Self { label, value }
    }
}

/// One page surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub id: String,
    #[serde(rename = "type", default = "canvas_type")]
    pub kind: String,
    #[serde(default)]
    pub label: LanguageMap,
    pub width: u32,
    pub height: u32,
    /// Painting annotation pages
    #[serde(default)]
    pub items: Vec<AnnotationPage>,
    /// Non-painting annotation pages (transcriptions, commentary)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationPage>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Canvas {
    pub fn new(id: impl Into<String>, label: LanguageMap, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            kind: canvas_type(),
            label,
            width,
            height,
            items: Vec::new(),
            annotations: Vec::new(),
            extra: Map::new(),
        }
    }

    /// The image painted by the first painting annotation.
    ///
    /// A `Choice` body resolves to its first image item.
    pub fn primary_image(&self) -> Option<&ImageResource> {
        let annotation = self.items.first()?.items.first()?;
        annotation.bodies().iter().find_map(|body| match body {
            Body::Image(image) => Some(image),
            Body::Choice(choice) => choice.items.iter().find_map(|item| match item {
                Body::Image(image) => Some(image),
                _ => None,
            }),
            _ => None,
        })
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.iter().map(|page| page.items.len()).sum()
    }
}

/// Image content resource, used for painting bodies and thumbnails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResource {
    pub id: String,
    #[serde(rename = "type", default = "image_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Image services are kept as-is; v2 and v3 services differ in shape
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: image_type(),
            format: None,
            width: None,
            height: None,
            service: Vec::new(),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn v3_manifest() -> Value {
        json!({
            "@context": PRESENTATION_3_CONTEXT,
            "id": "https://example.org/iiif/letter/manifest",
            "type": "Manifest",
            "label": { "en": ["Letter"] },
            "rights": "http://rightsstatements.org/vocab/NoC-US/1.0/",
            "items": [{
                "id": "https://example.org/iiif/letter/canvas/1",
                "type": "Canvas",
                "label": { "none": ["1"] },
                "width": 1200,
                "height": 1800,
                "items": [{
                    "id": "https://example.org/iiif/letter/canvas/1/page",
                    "type": "AnnotationPage",
                    "items": [{
                        "id": "https://example.org/iiif/letter/canvas/1/page/painting",
                        "type": "Annotation",
                        "motivation": "painting",
                        "body": {
                            "id": "https://example.org/iiif/2/abc/full/full/0/default.jpg",
                            "type": "Image",
                            "format": "image/jpeg",
                            "width": 1200,
                            "height": 1800
                        },
                        "target": "https://example.org/iiif/letter/canvas/1"
                    }]
                }]
            }]
        })
    }

    #[test]
    fn test_parse_v3_manifest_keeps_unknown_properties() {
        let manifest: Manifest = serde_json::from_value(v3_manifest()).unwrap();
        assert_eq!(manifest.items.len(), 1);
        assert_eq!(
            manifest.extra.get("rights").and_then(Value::as_str),
            Some("http://rightsstatements.org/vocab/NoC-US/1.0/")
        );

        let back = serde_json::to_value(&manifest).unwrap();
        assert_eq!(back["rights"], v3_manifest()["rights"]);
        assert_eq!(back["@context"], PRESENTATION_3_CONTEXT);
    }

    #[test]
    fn test_primary_image_is_first_painting_body() {
        let manifest: Manifest = serde_json::from_value(v3_manifest()).unwrap();
        let image = manifest.items[0].primary_image().unwrap();
        assert_eq!(
            image.id,
            "https://example.org/iiif/2/abc/full/full/0/default.jpg"
        );
        assert_eq!(image.width, Some(1200));
    }

    #[test]
    fn test_primary_image_resolves_choice() {
        let mut value = v3_manifest();
        value["items"][0]["items"][0]["items"][0]["body"] = json!({
            "type": "Choice",
            "items": [
                { "id": "https://example.org/color.jpg", "type": "Image" },
                { "id": "https://example.org/gray.jpg", "type": "Image" }
            ]
        });
        let manifest: Manifest = serde_json::from_value(value).unwrap();
        assert_eq!(
            manifest.items[0].primary_image().map(|i| i.id.as_str()),
            Some("https://example.org/color.jpg")
        );
    }

    #[test]
    fn test_canvas_without_painting_has_no_image() {
        let canvas = Canvas::new("https://example.org/c/1", LanguageMap::none("1"), 10, 10);
        assert!(canvas.primary_image().is_none());
        assert_eq!(canvas.annotation_count(), 0);
    }
}
