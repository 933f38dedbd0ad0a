//! Tone mirroring: guess how the user writes and greet them in kind.

use crate::store::{ChatMessage, RelationshipLevel, Role};
use serde::{Deserialize, Serialize};

/// How many recent user messages are inspected.
const WINDOW: usize = 3;

const HINGLISH_MARKERS: &[&str] = &[
    "bhai", "yaar", "kal", "aaj", "mera", "tera", "kya", "hai", "nahi", "haan",
];

const FORMAL_MARKERS: &[&str] = &[
    "please", "kindly", "assist", "require", "would like", "could you",
];

const BRIEF_BELOW_CHARS: usize = 20;
const DETAILED_ABOVE_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Casual,
    /// Polite markers such as "please" or "sir".
    Formal,
    /// Romanized Hindi mixed with English.
    Hinglish,
    /// Short messages on average.
    Brief,
    /// Long messages on average.
    Detailed,
}

/// Classify the tone of the last few user messages.
///
/// Checks run in priority order: two or more Hinglish markers, then any
/// formal marker, then average message length. No user messages reads as
/// casual.
pub fn detect_tone(messages: &[ChatMessage]) -> Tone {
    let recent: Vec<String> = messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.to_lowercase())
        .collect();
    let recent = &recent[recent.len().saturating_sub(WINDOW)..];
    if recent.is_empty() {
        return Tone::Casual;
    }

    let combined = recent.join(" ");
    let hits = |markers: &[&str]| markers.iter().filter(|w| combined.contains(*w)).count();

    // Average length compared without dividing.
    let total_chars: usize = recent.iter().map(|m| m.chars().count()).sum();
    let n = recent.len();

    if hits(HINGLISH_MARKERS) >= 2 {
        Tone::Hinglish
    } else if hits(FORMAL_MARKERS) >= 1 {
        Tone::Formal
    } else if total_chars < BRIEF_BELOW_CHARS * n {
        Tone::Brief
    } else if total_chars > DETAILED_ABOVE_CHARS * n {
        Tone::Detailed
    } else {
        Tone::Casual
    }
}

/// Opening words for a reply given the user's tone and how well we know them.
pub fn tone_prefix(tone: Tone, level: RelationshipLevel) -> &'static str {
    match (tone, level >= RelationshipLevel::BestFriend) {
        (Tone::Hinglish, true) => "Bhai! ",
        (_, true) => "Aye! ",
        (Tone::Hinglish, false) => "Yaar, ",
        _ => "",
    }
}
