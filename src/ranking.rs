//! Tools panel ordering.

use crate::catalog::{Catalog, CategoryFilter, ToolEntry};
use crate::store::ToolPreferences;
use std::cmp::Reverse;

/// Tools to show in the panel, in display order.
///
/// Applies the category filter, then the case-insensitive search `query`
/// (blank means no search), then drops hidden tools. The survivors are
/// stably sorted favorites first, then by usage count descending; ties keep
/// catalog order. Pure function of its inputs.
pub fn rank_for_display<'a>(
    catalog: &'a Catalog,
    filter: CategoryFilter,
    query: &str,
    prefs: &ToolPreferences,
) -> Vec<&'a ToolEntry> {
    let needle = query.trim().to_lowercase();

    let mut tools: Vec<&ToolEntry> = catalog
        .iter()
        .filter(|t| filter.matches(t.category))
        .filter(|t| needle.is_empty() || t.matches_query(&needle))
        .filter(|t| !prefs.get(&t.id).is_some_and(|p| p.is_hidden))
        .collect();

    tools.sort_by_key(|t| {
        let (favorite, usage) = prefs
            .get(&t.id)
            .map_or((false, 0), |p| (p.is_favorite, p.usage_count));
        (Reverse(favorite), Reverse(usage))
    });
    tools
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{tool, Category};
    use crate::store::ToolPreference;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            tool("five", "Five", Category::Image, &["art"]),
            tool("ten", "Ten", Category::Image, &["photo"]),
            tool("song", "Song Maker", Category::Audio, &["music"]),
            tool("idle", "Idle", Category::Image, &[]),
        ])
    }

    fn pref(id: &str, usage: u64, favorite: bool, hidden: bool) -> (String, ToolPreference) {
        (
            id.to_string(),
            ToolPreference {
                usage_count: usage,
                is_favorite: favorite,
                is_hidden: hidden,
                ..ToolPreference::new(id)
            },
        )
    }

    fn ids(tools: &[&ToolEntry]) -> Vec<String> {
        tools.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn higher_usage_ranks_first() {
        let catalog = catalog();
        let prefs: ToolPreferences =
            [pref("five", 5, false, false), pref("ten", 10, false, false)].into();
        let ranked = rank_for_display(&catalog, CategoryFilter::All, "", &prefs);
        assert_eq!(ids(&ranked), vec!["ten", "five", "song", "idle"]);
    }

    #[test]
    fn favorites_beat_usage() {
        let catalog = catalog();
        let prefs: ToolPreferences =
            [pref("ten", 10, false, false), pref("idle", 0, true, false)].into();
        let ranked = rank_for_display(&catalog, CategoryFilter::All, "", &prefs);
        assert_eq!(ids(&ranked), vec!["idle", "ten", "five", "song"]);
    }

    #[test]
    fn hidden_tools_never_appear() {
        let catalog = catalog();
        let prefs: ToolPreferences = [pref("ten", 100, true, true)].into();
        for filter in [CategoryFilter::All, CategoryFilter::Only(Category::Image)] {
            for query in ["", "ten", "photo", "t"] {
                let ranked = rank_for_display(&catalog, filter, query, &prefs);
                assert!(ranked.iter().all(|t| t.id != "ten"), "{filter:?} {query:?}");
            }
        }
    }

    #[test]
    fn category_filter_and_search_combine() {
        let catalog = catalog();
        let prefs = ToolPreferences::new();
        let image = rank_for_display(&catalog, CategoryFilter::Only(Category::Image), "", &prefs);
        assert_eq!(ids(&image), vec!["five", "ten", "idle"]);

        let music = rank_for_display(&catalog, CategoryFilter::All, "  MUSIC ", &prefs);
        assert_eq!(ids(&music), vec!["song"]);

        let none = rank_for_display(&catalog, CategoryFilter::Only(Category::Image), "music", &prefs);
        assert!(none.is_empty());
    }

    #[test]
    fn ranking_is_idempotent() {
        let catalog = catalog();
        let prefs: ToolPreferences = [
            pref("five", 3, false, false),
            pref("song", 3, true, false),
            pref("idle", 7, false, false),
        ]
        .into();
        let first = ids(&rank_for_display(&catalog, CategoryFilter::All, "", &prefs));
        let second = ids(&rank_for_display(&catalog, CategoryFilter::All, "", &prefs));
        assert_eq!(first, second);
        assert_eq!(first, vec!["song", "idle", "five", "ten"]);
    }
}
