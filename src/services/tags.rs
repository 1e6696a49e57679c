/// Split a comma-delimited tag string, dropping blanks and
/// case-insensitive duplicates while keeping first spelling.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Exact tag match, ignoring case
pub fn has_tag(raw: &str, tag: &str) -> bool {
    let tag = tag.trim();
    !tag.is_empty() && raw.split(',').any(|t| t.trim().eq_ignore_ascii_case(tag))
}

/// Distinct tags across many items, sorted for autosuggest
pub fn collect_tags<'a>(raws: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let joined: Vec<&str> = raws.into_iter().collect();
    let mut tags = parse_tags(&joined.join(","));
    tags.sort_by_key(|t| t.to_lowercase());
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_dedups() {
        assert_eq!(parse_tags(" beach, Summer ,,beach, summer"), vec!["beach", "Summer"]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn matches_whole_tags_only() {
        assert!(has_tag("beach,Summer", "summer"));
        assert!(!has_tag("beaches", "beach"));
        assert!(!has_tag("beach", " "));
    }

    #[test]
    fn collects_sorted_distinct_tags() {
        assert_eq!(collect_tags(["zoo,Beach", "beach, apple"]), vec!["apple", "Beach", "zoo"]);
    }
}
