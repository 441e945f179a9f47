use std::collections::BTreeSet;

/// Canonicalize a free-text field for comparison (trim + lowercase).
///
/// Absent and whitespace-only inputs both come back as `None`, so two absent
/// values can never compare equal through this function. Field matchers rely
/// on that: a tier only matches when *both* sides normalize to `Some`.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Canonicalize a list of strings into a sorted set, dropping entries that
/// normalize to nothing.
pub fn normalize_set(values: &[String]) -> BTreeSet<String> {
    values
        .iter()
        .filter_map(|value| normalize_text(Some(value.as_str())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_text(Some("  Maharashtra ")), Some("maharashtra".into()));
        assert_eq!(normalize_text(Some("PUNE")), Some("pune".into()));
    }

    #[test]
    fn absent_and_blank_normalize_to_none() {
        assert_eq!(normalize_text(None), None);
        assert_eq!(normalize_text(Some("")), None);
        assert_eq!(normalize_text(Some("   \t")), None);
    }

    #[test]
    fn set_drops_blank_entries_and_dedupes() {
        let set = normalize_set(&[
            "React".into(),
            " react ".into(),
            "".into(),
            "  ".into(),
            "CSS".into(),
        ]);

        assert_eq!(set.len(), 2);
        assert!(set.contains("react"));
        assert!(set.contains("css"));
    }

    #[test]
    fn set_is_sorted() {
        let set = normalize_set(&["TypeScript".into(), "css".into(), "React".into()]);
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(ordered, vec!["css", "react", "typescript"]);
    }
}
