//! Tag suggestion module.
//!
//! The "AI tagging" of the product is a capability interface with a single
//! keyword-heuristic implementation; a real inference-backed variant can be
//! substituted later without touching the callers.

use crate::models::AssetKind;

/// Name substrings and the tag each one implies.
const KEYWORD_TAGS: &[(&str, &str)] = &[
    ("logo", "logo"),
    ("banner", "banner"),
    ("wireframe", "wireframe"),
    ("guideline", "guidelines"),
];

/// A source of suggested tags for an asset.
pub trait TagSuggester: Send + Sync {
    /// Suggest tags from an asset's display name and kind. Suggestions are
    /// already normalized (lower-case, deduplicated).
    fn suggest(&self, name: &str, kind: AssetKind) -> Vec<String>;
}

/// Keyword-heuristic suggester: matches known substrings in the asset name
/// (case-insensitive) and adds a kind tag for images.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSuggester;

impl TagSuggester for KeywordSuggester {
    fn suggest(&self, name: &str, kind: AssetKind) -> Vec<String> {
        let lower = name.to_lowercase();
        let mut tags: Vec<String> = KEYWORD_TAGS
            .iter()
            .filter(|(needle, _)| lower.contains(needle))
            .map(|(_, tag)| tag.to_string())
            .collect();

        if kind == AssetKind::Image {
            tags.push("image".to_string());
        }

        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_matches_are_case_insensitive() {
        let tags = KeywordSuggester.suggest("Company Logo Final", AssetKind::Image);
        assert_eq!(tags, vec!["logo", "image"]);
    }

    #[test]
    fn test_guideline_maps_to_plural_tag() {
        let tags = KeywordSuggester.suggest("Brand Guideline v2", AssetKind::Document);
        assert_eq!(tags, vec!["guidelines"]);
    }

    #[test]
    fn test_multiple_keywords() {
        let tags = KeywordSuggester.suggest("logo banner wireframe", AssetKind::Video);
        assert_eq!(tags, vec!["logo", "banner", "wireframe"]);
    }

    #[test]
    fn test_no_matches() {
        let tags = KeywordSuggester.suggest("Quarterly Report", AssetKind::Document);
        assert!(tags.is_empty());
    }
}
