use paleo_types::{LanguageMap, MetadataEntry};
use serde_json::Value;

/// Metadata pairs from a decoded description.
///
/// Top-level fields become entries in order; arrays are joined with `; `,
/// nested objects are flattened as `parent / child` labels and nulls or
/// empty values are skipped.
pub fn metadata_entries(description: &Value) -> Vec<MetadataEntry> {
    let mut entries = Vec::new();
    if let Value::Object(fields) = description {
        for (label, value) in fields {
            push_entries(&mut entries, label, value);
        }
    }
    entries
}

fn push_entries(entries: &mut Vec<MetadataEntry>, label: &str, value: &Value) {
    match value {
        Value::Object(fields) => {
            for (child, value) in fields {
                push_entries(entries, &format!("{label} / {child}"), value);
            }
        }
        other => {
            if let Some(text) = display(other).filter(|text| !text.is_empty()) {
                entries.push(MetadataEntry::new(
                    LanguageMap::none(label),
                    LanguageMap::none(text),
                ));
            }
        }
    }
}

fn display(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.trim().to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(display)
                .filter(|s| !s.is_empty())
                .collect();
            Some(parts.join("; "))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_metadata_entries_flatten_description() {
        let description = json!({
            "title": "Letter from W. J. Swain",
            "date": 1885,
            "people": ["W. J. Swain", "L. L. McInnis"],
            "place": { "city": "Austin" },
            "notes": null,
            "summary": ""
        });

        let entries = metadata_entries(&description);
        let pairs: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.label.first().unwrap(), e.value.first().unwrap()))
            .collect();

        assert_eq!(
            pairs,
            [
                ("title", "Letter from W. J. Swain"),
                ("date", "1885"),
                ("people", "W. J. Swain; L. L. McInnis"),
                ("place / city", "Austin"),
            ]
        );
    }

    #[test]
    fn test_non_object_description_has_no_entries() {
        assert!(metadata_entries(&json!("just text")).is_empty());
    }
}
