use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::mode::SearchMode;

/// Sentinel stored in [`CandidateResult::email`] when the snippet has none.
pub const NO_EMAIL: &str = "N/A";

/// One search-provider result, exactly as the provider returned it.
///
/// Missing fields deserialize to empty strings; an empty `url` is rejected by
/// every mode's URL-shape check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(default, alias = "href")]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "body")]
    pub snippet: String,
}

impl RawHit {
    pub fn new(url: impl Into<String>, title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
        }
    }

    /// Map a loosely-typed provider item into a hit.
    ///
    /// Non-string or missing fields become empty strings rather than errors.
    pub fn from_json(item: &serde_json::Value) -> Self {
        let field = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| item.get(*k).and_then(|v| v.as_str()))
                .unwrap_or_default()
                .to_string()
        };

        Self {
            url: field(&["href", "url"]),
            title: field(&["title"]),
            snippet: field(&["body", "snippet"]),
        }
    }
}

/// An accepted hit, ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    /// Page title with mode-specific brand suffixes removed.
    pub display_name: String,
    pub profile_url: String,
    pub summary: String,
    /// First address found in the snippet, or [`NO_EMAIL`].
    pub email: String,
    pub source_mode: SearchMode,
}

impl CandidateResult {
    pub fn has_email(&self) -> bool {
        self.email != NO_EMAIL
    }
}

/// Ordered, URL-deduplicated candidate list.
///
/// Order is provider order. No two entries share a lower-cased URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    items: Vec<CandidateResult>,
}

impl ResultSet {
    /// Build a set from raw results, keeping the first entry per lower-cased URL.
    pub fn dedup_from(results: Vec<CandidateResult>) -> Self {
        let mut seen = HashSet::new();
        let items = results
            .into_iter()
            .filter(|r| seen.insert(r.profile_url.to_lowercase()))
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateResult> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[CandidateResult] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a CandidateResult;
    type IntoIter = std::slice::Iter<'a, CandidateResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(url: &str, name: &str) -> CandidateResult {
        CandidateResult {
            display_name: name.into(),
            profile_url: url.into(),
            summary: String::new(),
            email: NO_EMAIL.into(),
            source_mode: SearchMode::LinkedIn,
        }
    }

    #[test]
    fn dedup_is_case_insensitive_and_keeps_first() {
        let set = ResultSet::dedup_from(vec![
            candidate("https://linkedin.com/in/Ana", "first"),
            candidate("https://linkedin.com/in/bruno", "bruno"),
            candidate("https://LINKEDIN.com/in/ana", "second"),
        ]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].display_name, "first");
        assert_eq!(set.as_slice()[1].display_name, "bruno");
    }

    #[test]
    fn raw_hit_from_provider_json() {
        let item = serde_json::json!({
            "href": "https://linkedin.com/in/ana",
            "title": "Ana - LinkedIn",
            "body": "Dev em Campinas"
        });
        let hit = RawHit::from_json(&item);
        assert_eq!(hit.url, "https://linkedin.com/in/ana");
        assert_eq!(hit.snippet, "Dev em Campinas");
    }

    #[test]
    fn raw_hit_missing_fields_default_to_empty() {
        let hit = RawHit::from_json(&serde_json::json!({"title": 42}));
        assert_eq!(hit, RawHit::default());

        let hit: RawHit = serde_json::from_str(r#"{"href": "https://x.com"}"#).unwrap();
        assert_eq!(hit.url, "https://x.com");
        assert!(hit.title.is_empty());
        assert!(hit.snippet.is_empty());
    }

    #[test]
    fn result_set_serializes_as_array() {
        let set = ResultSet::dedup_from(vec![candidate("https://a", "a")]);
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["source_mode"], "linkedin");
        assert_eq!(json[0]["email"], "N/A");
    }
}
