//! Containment-based deduplication of category entries.
//!
//! Two entries are duplicates when, after trimming and lowercasing, one equals
//! or contains the other. The first-seen entry wins and is returned with its
//! original text. Near-duplicates with no substring relation are both kept.

fn normalize(entry: &str) -> String {
    entry.trim().to_lowercase()
}

/// Drop entries that equal, contain, or are contained in an earlier entry.
pub fn deduplicate<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut result = Vec::new();

    for entry in entries {
        let entry = entry.as_ref();
        let normalized = normalize(entry);

        let duplicate = seen
            .iter()
            .any(|s| s.contains(normalized.as_str()) || normalized.contains(s.as_str()));
        if duplicate {
            continue;
        }

        seen.push(normalized);
        result.push(entry.to_string());
    }

    result
}
