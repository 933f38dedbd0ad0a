//! Assistant mode detection.
//!
//! Orthogonal to the category: the mode says what kind of help the user
//! wants (find a tool, chat, code, translate, summarize), the category says
//! which tool domain it concerns.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssistantMode {
    /// Recommend tools from the catalog.
    #[default]
    ToolFinder,
    /// Open-ended conversation.
    Chat,
    /// Programming help.
    Code,
    /// Translate a text.
    Translate,
    /// Condense a text.
    Summary,
}

/// Mode keywords (English, Hinglish, Devanagari), in tie-break order.
const MODE_KEYWORDS: &[(AssistantMode, &[&str])] = &[
    (
        AssistantMode::ToolFinder,
        &[
            "tool", "app", "website", "find", "suggest", "banana", "chahiye", "बनाना", "चाहिए",
            "dhundho", "ढूंढो",
        ],
    ),
    (
        AssistantMode::Chat,
        &[
            "what", "how", "why", "explain", "tell", "kya", "kaise", "kyun", "क्या", "कैसे",
            "क्यों", "बताओ",
        ],
    ),
    (
        AssistantMode::Code,
        &[
            "code", "program", "function", "bug", "script", "html", "css", "javascript", "python",
            "कोड",
        ],
    ),
    (
        AssistantMode::Translate,
        &["translate", "translation", "meaning", "anuvad", "अनुवाद", "matlab", "मतलब"],
    ),
    (
        AssistantMode::Summary,
        &["summarize", "summary", "short", "brief", "tldr", "संक्षेप", "short mein"],
    ),
];

impl AssistantMode {
    pub const ALL: &'static [AssistantMode] = &[
        AssistantMode::ToolFinder,
        AssistantMode::Chat,
        AssistantMode::Code,
        AssistantMode::Translate,
        AssistantMode::Summary,
    ];

    pub fn id(self) -> &'static str {
        match self {
            AssistantMode::ToolFinder => "tool-finder",
            AssistantMode::Chat => "chat",
            AssistantMode::Code => "code",
            AssistantMode::Translate => "translate",
            AssistantMode::Summary => "summary",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            AssistantMode::ToolFinder => "\u{1f527} Tool Finder",
            AssistantMode::Chat => "\u{1f4ac} Chat",
            AssistantMode::Code => "\u{1f4bb} Code",
            AssistantMode::Translate => "\u{1f310} Translate",
            AssistantMode::Summary => "\u{1f4c4} Summary",
        }
    }
}

impl std::fmt::Display for AssistantMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Pick the mode whose keywords occur most often as substrings.
/// Nothing matched, or a tie with an earlier mode, yields the earlier one.
pub fn detect_mode(input: &str) -> AssistantMode {
    let lower = input.to_lowercase();
    let mut best = AssistantMode::ToolFinder;
    let mut max = 0;
    for (mode, keywords) in MODE_KEYWORDS {
        let score = keywords.iter().filter(|kw| lower.contains(**kw)).count();
        if score > max {
            max = score;
            best = *mode;
        }
    }
    best
}
