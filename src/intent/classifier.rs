//! Local keyword classifier.
//!
//! Scores every lexicon category by how many of its keywords occur as plain
//! substrings of the lowercased input, then derives a tool shortlist from
//! the catalog. No tokenization or stemming: "drawing" matches "draw", and
//! "app" matches inside "happy".

use super::lexicon::KeywordLexicon;
use super::mode::detect_mode;
use super::{ClassificationResult, LOCAL_CONFIDENCE, MAX_SUGGESTIONS};
use crate::catalog::{Catalog, Category};
use std::sync::Arc;

/// Offline classifier over a fixed lexicon and catalog.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    lexicon: KeywordLexicon,
    catalog: Arc<Catalog>,
}

impl KeywordClassifier {
    pub fn new(lexicon: KeywordLexicon, catalog: Arc<Catalog>) -> Self {
        Self { lexicon, catalog }
    }

    /// Classify without any network access.
    ///
    /// Blank input short-circuits to `chat` with no matches and an empty
    /// shortlist.
    pub fn classify(&self, input: &str) -> ClassificationResult {
        if input.trim().is_empty() {
            return ClassificationResult {
                intent: intent_text(Category::Chat.id()),
                category: Category::Chat.id().to_string(),
                matched_keywords: Vec::new(),
                confidence: LOCAL_CONFIDENCE,
                suggested_tool_ids: Vec::new(),
                used_remote_service: false,
                mode: detect_mode(input),
            };
        }

        let lower = input.to_lowercase();
        let (category, matched_keywords) = self.best_category(&lower);
        let suggested_tool_ids = self.shortlist(category.id(), &matched_keywords);

        tracing::debug!(
            category = %category,
            matches = matched_keywords.len(),
            suggestions = suggested_tool_ids.len(),
            "Local keyword classification"
        );

        ClassificationResult {
            intent: intent_text(category.id()),
            category: category.id().to_string(),
            matched_keywords,
            confidence: LOCAL_CONFIDENCE,
            suggested_tool_ids,
            used_remote_service: false,
            mode: detect_mode(input),
        }
    }

    /// Category with the strictly greatest match count. Ties keep the
    /// category seen first in lexicon order; zero matches yield `chat`.
    fn best_category(&self, lower: &str) -> (Category, Vec<String>) {
        let mut best = Category::Chat;
        let mut best_matches: Vec<String> = Vec::new();

        for (category, keywords) in self.lexicon.iter() {
            let mut matches: Vec<String> = Vec::new();
            for kw in keywords {
                if lower.contains(kw.as_str()) && !matches.contains(kw) {
                    matches.push(kw.clone());
                }
            }
            if matches.len() > best_matches.len() {
                best = category;
                best_matches = matches;
            }
        }

        (best, best_matches)
    }

    /// First [`MAX_SUGGESTIONS`] catalog tools, in catalog order, that are in
    /// `category`, carry a tag among `matched`, or whose name contains a
    /// matched keyword.
    pub fn shortlist(&self, category: &str, matched: &[String]) -> Vec<String> {
        self.catalog
            .iter()
            .filter(|tool| {
                let name = tool.name.to_lowercase();
                tool.category.id() == category
                    || tool
                        .tags
                        .iter()
                        .any(|tag| matched.contains(&tag.to_lowercase()))
                    || matched.iter().any(|kw| name.contains(kw.as_str()))
            })
            .take(MAX_SUGGESTIONS)
            .map(|tool| tool.id.clone())
            .collect()
    }
}

fn intent_text(category: &str) -> String {
    format!("User is asking about {category}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tool;
    use std::collections::HashSet;

    fn classifier() -> KeywordClassifier {
        KeywordClassifier::new(KeywordLexicon::builtin(), Arc::new(Catalog::builtin()))
    }

    fn small_classifier() -> KeywordClassifier {
        let catalog = Catalog::new(vec![
            tool("w1", "Wordsmith", Category::Writing, &[]),
            tool("i1", "Pixel Forge", Category::Image, &["anime"]),
            tool("i2", "Canvas", Category::Image, &[]),
            tool("a1", "Anime Studio", Category::Video, &[]),
            tool("i3", "Lens", Category::Image, &[]),
            tool("i4", "Brush", Category::Image, &[]),
        ]);
        KeywordClassifier::new(KeywordLexicon::builtin(), Arc::new(catalog))
    }

    #[test]
    fn anime_image_request_is_image() {
        let result = classifier().classify("make an anime style image");
        assert_eq!(result.category, "image");
        assert!(result.matched_keywords.contains(&"anime".to_string()));
        assert!(result.matched_keywords.contains(&"image".to_string()));
        assert!(!result.used_remote_service);
        assert_eq!(result.confidence, LOCAL_CONFIDENCE);
    }

    #[test]
    fn empty_input_is_chat_with_no_shortlist() {
        for input in ["", "   ", "\n\t"] {
            let result = classifier().classify(input);
            assert_eq!(result.category, "chat");
            assert!(result.matched_keywords.is_empty());
            assert!(result.suggested_tool_ids.is_empty());
        }
    }

    #[test]
    fn no_matches_defaults_to_chat() {
        let result = classifier().classify("zzz qqq");
        assert_eq!(result.category, "chat");
        assert!(result.matched_keywords.is_empty());
        // Chat tools still qualify by category.
        assert!(!result.suggested_tool_ids.is_empty());
    }

    #[test]
    fn devanagari_only_input_is_safe() {
        let result = classifier().classify("मुझे कुछ चाहिए");
        assert_eq!(result.category, "chat");
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let result = classifier().classify("EDIT MY VIDEO CLIP");
        assert_eq!(result.category, "video");
    }

    #[test]
    fn substring_inside_longer_word_counts() {
        // "drawing" contains "draw", "paintings" contains "paint"
        let result = classifier().classify("drawings and paintings");
        assert_eq!(result.category, "image");
        assert!(result.matched_keywords.contains(&"draw".to_string()));
        assert!(result.matched_keywords.contains(&"paint".to_string()));
    }

    #[test]
    fn tie_goes_to_first_category_in_lexicon_order() {
        // "edit" is both an image and a video keyword.
        let result = classifier().classify("edit");
        assert_eq!(result.category, "image");
    }

    #[test]
    fn later_category_wins_only_with_strictly_more_matches() {
        // image: edit (1); video: edit, clip (2)
        let result = classifier().classify("edit clip");
        assert_eq!(result.category, "video");
    }

    #[test]
    fn shortlist_is_bounded_distinct_and_from_catalog() {
        let c = classifier();
        for input in [
            "make an anime style image",
            "write a blog post",
            "python web app with react and css",
            "podcast voice narration music",
            "",
            "random words",
        ] {
            let result = c.classify(input);
            assert!(result.suggested_tool_ids.len() <= MAX_SUGGESTIONS);
            let distinct: HashSet<&String> = result.suggested_tool_ids.iter().collect();
            assert_eq!(distinct.len(), result.suggested_tool_ids.len());
            for id in &result.suggested_tool_ids {
                assert!(c.catalog.contains(id), "{id} not in catalog");
            }
        }
    }

    #[test]
    fn shortlist_follows_catalog_order_across_rules() {
        let result = small_classifier().classify("anime image");
        // w1 doesn't qualify; i1 by category+tag; i2 by category;
        // a1 by name containing "anime"; truncated at three.
        assert_eq!(result.suggested_tool_ids, vec!["i1", "i2", "a1"]);
    }

    #[test]
    fn shortlist_qualifies_by_tag_outside_category() {
        let c = small_classifier();
        let ids = c.shortlist("code", &["anime".to_string()]);
        assert_eq!(ids, vec!["i1", "a1"]);
    }

    #[test]
    fn intent_mentions_category() {
        let result = classifier().classify("write an essay");
        assert_eq!(result.category, "writing");
        assert_eq!(result.intent, "User is asking about writing");
    }
}
