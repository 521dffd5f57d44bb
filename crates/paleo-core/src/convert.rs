//! Presentation 2 to Presentation 3 conversion.

use paleo_types::{
    Annotation, AnnotationPage, Body, Canvas, ImageResource, LanguageMap, Manifest,
    MetadataEntry, Motivation, Target,
};
use serde_json::{Value, json};

use crate::error::SchemaError;
use crate::image_uri;

/// Parse a manifest document of either version.
///
/// Documents carrying a v2 `@id` are converted; anything else must already
/// match the v3 model. `new_id` replaces the identifier in both cases.
pub fn load_manifest(document: Value, new_id: Option<&str>) -> Result<Manifest, SchemaError> {
    if document.get("@id").is_some() {
        tracing::debug!("Converting Presentation 2 manifest");
        return convert(&document, new_id);
    }

    let mut manifest: Manifest = serde_json::from_value(document)?;
    if let Some(id) = new_id {
        manifest.id = id.to_string();
    }
    Ok(manifest)
}

/// Convert a Presentation 2 manifest.
///
/// All-or-nothing: the first missing or malformed field aborts the whole
/// conversion.
pub fn convert(legacy: &Value, new_id: Option<&str>) -> Result<Manifest, SchemaError> {
    let legacy_id = str_field(legacy, "@id", "@id")?;
    let id = new_id.unwrap_or(legacy_id);

    let label = language_map(field(legacy, "label", "label")?, "label")?;
    let mut manifest = Manifest::new(id, label);

    manifest.metadata = metadata(field(legacy, "metadata", "metadata")?)?;
    manifest.thumbnail = vec![thumbnail(field(legacy, "thumbnail", "thumbnail")?)?];

    let canvases = field(legacy, "sequences", "sequences")?
        .get(0)
        .ok_or_else(|| SchemaError::MissingField("sequences[0]".into()))?;
    let canvases = field(canvases, "canvases", "sequences[0].canvases")?
        .as_array()
        .ok_or_else(|| SchemaError::invalid("sequences[0].canvases", "expected an array"))?;

    manifest.items = canvases
        .iter()
        .enumerate()
        .map(|(index, canvas)| convert_canvas(canvas, index))
        .collect::<Result<_, _>>()?;

    tracing::debug!(
        "Converted {} with {} canvases",
        manifest.id,
        manifest.items.len()
    );

    Ok(manifest)
}

fn convert_canvas(canvas: &Value, index: usize) -> Result<Canvas, SchemaError> {
    let path = format!("sequences[0].canvases[{index}]");

    let id = str_field(canvas, "@id", &format!("{path}.@id"))?;
    let label = match canvas.get("label") {
        Some(label) => language_map(label, &format!("{path}.label"))?,
        None => LanguageMap::none(""),
    };
    let width = dimension(canvas, "width", &path)?;
    let height = dimension(canvas, "height", &path)?;

    let image = canvas
        .get("images")
        .and_then(|images| images.get(0))
        .ok_or_else(|| SchemaError::MissingField(format!("{path}.images[0]")))?;
    let image_id = str_field(image, "@id", &format!("{path}.images[0].@id"))?;

    let mut body = ImageResource::new(image_id);
    body.width = Some(width);
    body.height = Some(height);

    let resource = image.get("resource");
    body.format = resource
        .and_then(|r| r.get("format"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| image_uri::format_from_extension(image_id).map(str::to_string));
    body.service = image_service(resource, image_id);

    let page_id = format!("{id}/page/1");
    let mut page = AnnotationPage::new(&page_id);
    page.items.push(Annotation::new(
        format!("{page_id}/annotation/1"),
        Motivation::Painting,
        Body::Image(body),
        Target::canvas(id),
    ));

    let mut converted = Canvas::new(id, label, width, height);
    converted.items.push(page);
    Ok(converted)
}

/// Service declared by the v2 resource, else one derived from an Image API URL
fn image_service(resource: Option<&Value>, image_id: &str) -> Vec<Value> {
    match resource.and_then(|r| r.get("service")) {
        Some(Value::Array(services)) => services.clone(),
        Some(service @ Value::Object(_)) => vec![service.clone()],
        _ => image_uri::service_base(image_id)
            .map(|base| {
                vec![json!({
                    "@id": base,
                    "@type": "ImageService2",
                    "profile": "http://iiif.io/api/image/2/level2.json"
                })]
            })
            .unwrap_or_default(),
    }
}

fn metadata(value: &Value) -> Result<Vec<MetadataEntry>, SchemaError> {
    let pairs = value
        .as_array()
        .ok_or_else(|| SchemaError::invalid("metadata", "expected an array"))?;

    pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| {
            let path = format!("metadata[{index}]");
            let label = language_map(
                field(pair, "label", &format!("{path}.label"))?,
                &format!("{path}.label"),
            )?;
            let value = language_map(
                field(pair, "value", &format!("{path}.value"))?,
                &format!("{path}.value"),
            )?;
            Ok(MetadataEntry::new(label, value))
        })
        .collect()
}

fn thumbnail(value: &Value) -> Result<ImageResource, SchemaError> {
    let id = match value {
        Value::String(id) => id.as_str(),
        Value::Array(items) => {
            let first = items
                .first()
                .ok_or_else(|| SchemaError::MissingField("thumbnail[0]".into()))?;
            return thumbnail(first);
        }
        _ => str_field(value, "@id", "thumbnail.@id")?,
    };

    Ok(ImageResource::new(id.trim()))
}

/// v2 strings, string arrays and `@value`/`@language` objects as a language map
fn language_map(value: &Value, path: &str) -> Result<LanguageMap, SchemaError> {
    let mut map = LanguageMap::default();
    push_language_value(&mut map, value, path)?;
    Ok(map)
}

fn push_language_value(
    map: &mut LanguageMap,
    value: &Value,
    path: &str,
) -> Result<(), SchemaError> {
    match value {
        Value::String(text) => map.push("none", text.as_str()),
        Value::Number(number) => map.push("none", number.to_string()),
        Value::Bool(flag) => map.push("none", flag.to_string()),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if item.is_array() {
                    return Err(SchemaError::invalid(
                        format!("{path}[{index}]"),
                        "nested arrays are not language values",
                    ));
                }
                push_language_value(map, item, &format!("{path}[{index}]"))?;
            }
        }
        Value::Object(object) => {
            let text = object
                .get("@value")
                .and_then(Value::as_str)
                .ok_or_else(|| SchemaError::MissingField(format!("{path}.@value")))?;
            let language = object
                .get("@language")
                .and_then(Value::as_str)
                .unwrap_or("none");
            map.push(language, text);
        }
        Value::Null => return Err(SchemaError::invalid(path, "null is not a language value")),
    }
    Ok(())
}

fn field<'a>(value: &'a Value, key: &str, path: &str) -> Result<&'a Value, SchemaError> {
    match value.get(key) {
        Some(Value::Null) | None => Err(SchemaError::MissingField(path.to_string())),
        Some(found) => Ok(found),
    }
}

fn str_field<'a>(value: &'a Value, key: &str, path: &str) -> Result<&'a str, SchemaError> {
    field(value, key, path)?
        .as_str()
        .ok_or_else(|| SchemaError::invalid(path, "expected a string"))
}

/// Pixel dimension; numeric strings are accepted
fn dimension(canvas: &Value, key: &str, path: &str) -> Result<u32, SchemaError> {
    let path = format!("{path}.{key}");
    let value = field(canvas, key, &path)?;

    let parsed = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| SchemaError::invalid(path, "expected a non-negative integer"))
}
