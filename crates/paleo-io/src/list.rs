use std::collections::HashSet;

/// Identifiers read from a list file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListEntries {
    /// Unique identifiers in first-seen order
    pub identifiers: Vec<String>,
    /// Lines dropped as repeats of an earlier identifier
    pub duplicates: usize,
}

/// One identifier per line; blank lines are ignored and repeats are
/// dropped after their first occurrence
pub fn parse_list(text: &str) -> ListEntries {
    let mut seen = HashSet::new();
    let mut entries = ListEntries::default();

    for line in text.lines() {
        let identifier = line.trim();
        if identifier.is_empty() {
            continue;
        }
        if seen.insert(identifier) {
            entries.identifiers.push(identifier.to_string());
        } else {
            tracing::debug!("Skipping duplicate identifier {identifier}");
            entries.duplicates += 1;
        }
    }

    entries
}
