//! Category → trigger keyword table.

use crate::catalog::Category;

/// Built-in keyword table, in lexicon order.
///
/// Order matters only for tie-breaking: when two categories match the same
/// number of keywords, the one declared first wins. `chat` has no keywords;
/// it is the fallback when nothing matches.
const KEYWORD_MAP: &[(Category, &[&str])] = &[
    (
        Category::Image,
        &[
            "photo", "image", "picture", "draw", "generate", "art", "paint", "logo", "design",
            "poster", "banner", "thumbnail", "background", "remove", "upscale", "edit", "filter",
            "sketch", "portrait", "landscape", "illustration", "icon", "avatar", "anime", "manga",
            "comic", "3d", "render",
        ],
    ),
    (
        Category::Video,
        &[
            "video", "movie", "film", "clip", "animation", "motion", "youtube", "tiktok", "reel",
            "short", "edit", "cut", "trim", "merge", "transition", "vfx", "cgi",
        ],
    ),
    (
        Category::Writing,
        &[
            "write", "text", "article", "blog", "essay", "story", "poem", "script", "email",
            "letter", "resume", "cv", "summary", "translate", "grammar", "spell", "check",
            "editor", "proofread", "copy", "content",
        ],
    ),
    (
        Category::Code,
        &[
            "code", "program", "develop", "software", "app", "web", "mobile", "desktop", "script",
            "automation", "api", "database", "server", "cloud", "devops", "security", "react",
            "next", "typescript", "javascript", "python", "java", "cpp", "html", "css",
        ],
    ),
    (
        Category::Audio,
        &[
            "audio", "sound", "music", "voice", "speech", "narration", "podcast", "song", "track",
            "album", "tts", "stt", "transcription",
        ],
    ),
    (
        Category::Productivity,
        &[
            "productivity", "schedule", "plan", "organize", "manage", "task", "project",
            "workflow", "note", "document", "spreadsheet", "presentation", "slide", "deck",
            "pitch",
        ],
    ),
    (
        Category::Design,
        &[
            "design", "ui", "ux", "interface", "experience", "layout", "grid", "color", "palette",
            "gradient", "font", "typography", "vector", "raster", "pixel",
        ],
    ),
];

/// Ordered mapping from category to lowercase trigger keywords.
#[derive(Debug, Clone)]
pub struct KeywordLexicon {
    entries: Vec<(Category, Vec<String>)>,
}

impl KeywordLexicon {
    /// Build a lexicon; keywords are lowercased and blank ones dropped.
    pub fn new(entries: Vec<(Category, Vec<String>)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(cat, kws)| {
                let kws = kws
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (cat, kws)
            })
            .collect();
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(
            KEYWORD_MAP
                .iter()
                .map(|(cat, kws)| (*cat, kws.iter().map(|k| (*k).to_string()).collect()))
                .collect(),
        )
    }

    /// Categories with their keywords, in lexicon order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.entries.iter().map(|(cat, kws)| (*cat, kws.as_slice()))
    }
}

impl Default for KeywordLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_preserves_declaration_order() {
        let order: Vec<Category> = KeywordLexicon::builtin().iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                Category::Image,
                Category::Video,
                Category::Writing,
                Category::Code,
                Category::Audio,
                Category::Productivity,
                Category::Design,
            ]
        );
    }

    #[test]
    fn chat_has_no_keywords() {
        assert!(KeywordLexicon::builtin()
            .iter()
            .all(|(cat, _)| cat != Category::Chat));
    }

    #[test]
    fn new_normalizes_keywords() {
        let lex = KeywordLexicon::new(vec![(
            Category::Code,
            vec!["  Rust ".into(), "".into(), "   ".into()],
        )]);
        let entries: Vec<(Category, &[String])> = lex.iter().collect();
        assert_eq!(entries, vec![(Category::Code, &["rust".to_string()][..])]);
    }
}
