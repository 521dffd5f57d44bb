use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON with 4-space indentation
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Serialize `value` to `path`, creating parent directories
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), WriteError> {
    let json = to_json_string(value)?;
    let io_error = |source| WriteError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, json).await.map_err(io_error)?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// File name for a manifest identifier: scheme dropped, anything outside
/// `[A-Za-z0-9._-]` replaced by `_`
pub fn output_file_name(identifier: &str) -> String {
    let trimmed = identifier.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest)
        .trim_end_matches('/');
    let stem = without_scheme
        .strip_suffix(".json")
        .unwrap_or(without_scheme);

    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{sanitized}.json")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_four_space_indent() {
        let json = to_json_string(&json!({ "a": [1] })).unwrap();
        assert_eq!(json, "{\n    \"a\": [\n        1\n    ]\n}");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("https://example.org/iiif/123/manifest"),
            "example.org_iiif_123_manifest.json"
        );
        assert_eq!(
            output_file_name("https://example.org/iiif/abc.json"),
            "example.org_iiif_abc.json"
        );
        assert_eq!(output_file_name("mcinnis 39"), "mcinnis_39.json");
    }

    #[tokio::test]
    async fn test_write_json_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("m.json");

        write_json(&path, &json!({ "id": "x" })).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n    \"id\": \"x\"\n}");
    }
}
