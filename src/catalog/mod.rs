//! Static tool catalog and category metadata.
//!
//! The catalog is loaded once at startup and never mutated. Every
//! recommendation, panel listing and usage counter refers back to a
//! [`ToolEntry`] by its `id`.

mod links;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ── Categories ─────────────────────────────────────────────────────

/// Tool domains shown as tabs in the tools panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Image generation and editing.
    Image,
    /// Video generation and editing.
    Video,
    /// Copywriting, essays and grammar.
    Writing,
    /// Coding assistants and AI-first editors.
    Code,
    /// Music, voice and speech.
    Audio,
    /// Notes, presentations and document workflows.
    Productivity,
    /// Logos, layouts and UI design.
    Design,
    /// General-purpose chat assistants; also the classifier default.
    Chat,
}

impl Category {
    /// All categories in display order.
    pub const ALL: &'static [Category] = &[
        Category::Image,
        Category::Video,
        Category::Writing,
        Category::Code,
        Category::Audio,
        Category::Productivity,
        Category::Design,
        Category::Chat,
    ];

    /// Identifier used in stored messages and the remote intent payload.
    pub fn id(self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Video => "video",
            Category::Writing => "writing",
            Category::Code => "code",
            Category::Audio => "audio",
            Category::Productivity => "productivity",
            Category::Design => "design",
            Category::Chat => "chat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Image => "Image",
            Category::Video => "Video",
            Category::Writing => "Writing",
            Category::Code => "Code",
            Category::Audio => "Audio",
            Category::Productivity => "Productivity",
            Category::Design => "Design",
            Category::Chat => "Chat",
        }
    }

    /// Emoji shown next to the label on the category tab.
    pub fn icon(self) -> &'static str {
        match self {
            Category::Image => "\u{1f3a8}",
            Category::Video => "\u{1f3ac}",
            Category::Writing => "\u{270d}\u{fe0f}",
            Category::Code => "\u{1f4bb}",
            Category::Audio => "\u{1f3b5}",
            Category::Productivity => "\u{1f4cb}",
            Category::Design => "\u{1f58c}\u{fe0f}",
            Category::Chat => "\u{1f4ac}",
        }
    }

    /// Parse from the string id. Matching is exact.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.id() == id)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Category filter applied to the tools panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    /// Tools of one category.
    Only(Category),
}

impl CategoryFilter {
    /// Parse a filter id. `"all"` and unknown ids both map to [`CategoryFilter::All`],
    /// so a remote service inventing a category never empties the panel.
    pub fn from_id(id: &str) -> Self {
        Category::from_id(id).map_or(CategoryFilter::All, CategoryFilter::Only)
    }

    pub fn id(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.id(),
        }
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }
}

/// One tab of the tools panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTab {
    pub id: String,
    pub name: String,
    pub icon: String,
}

/// Tabs in panel order, starting with the `all` pseudo-category.
pub fn category_tabs() -> Vec<CategoryTab> {
    let mut tabs = vec![CategoryTab {
        id: "all".to_string(),
        name: "All".to_string(),
        icon: "\u{2728}".to_string(),
    }];
    tabs.extend(Category::ALL.iter().map(|cat| CategoryTab {
        id: cat.id().to_string(),
        name: cat.label().to_string(),
        icon: cat.icon().to_string(),
    }));
    tabs
}

// ── Tool entries ───────────────────────────────────────────────────

/// A single external tool link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
    /// Lowercase tags, matched against classifier keywords.
    pub tags: BTreeSet<String>,
    pub url: String,
}

impl ToolEntry {
    /// Case-insensitive substring search over name, description and tags.
    /// `needle` must already be lowercase.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

// ── Catalog ────────────────────────────────────────────────────────

/// Immutable, ordered registry of tools. Iteration order is declaration
/// order and is relied upon for shortlist selection and ranking ties.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tools: Vec<ToolEntry>,
}

impl Catalog {
    /// Build a catalog from entries. Later duplicates of an id are dropped.
    pub fn new(entries: Vec<ToolEntry>) -> Self {
        let mut seen = BTreeSet::new();
        let tools = entries
            .into_iter()
            .filter(|t| {
                let fresh = seen.insert(t.id.clone());
                if !fresh {
                    tracing::warn!(id = %t.id, "Duplicate tool id in catalog, keeping first");
                }
                fresh
            })
            .collect();
        Self { tools }
    }

    /// The compiled-in catalog.
    pub fn builtin() -> Self {
        Self::new(links::builtin_tools())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolEntry> {
        self.tools.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ToolEntry> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Resolve ids to entries in the given order, dropping unknown ids.
    pub fn resolve<'a, I, S>(&'a self, ids: I) -> Vec<&'a ToolEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| {
                let found = self.get(id.as_ref());
                if found.is_none() {
                    tracing::debug!(id = id.as_ref(), "Dropping unknown tool id");
                }
                found
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn tool(id: &str, name: &str, category: Category, tags: &[&str]) -> ToolEntry {
    ToolEntry {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: format!("{name} description"),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
        url: format!("https://example.com/{id}"),
    }
}
