//! Compiled-in tool links.

use super::{Category, ToolEntry};

/// `(id, name, category, description, tags, url)`
type Row = (
    &'static str,
    &'static str,
    Category,
    &'static str,
    &'static [&'static str],
    &'static str,
);

const TOOLS: &[Row] = &[
    // ── Image ──
    (
        "leonardo",
        "Leonardo AI",
        Category::Image,
        "Generate art, game assets and illustrations from prompts",
        &["art", "image", "generate", "anime", "illustration", "3d"],
        "https://leonardo.ai",
    ),
    (
        "bing-image-creator",
        "Bing Image Creator",
        Category::Image,
        "Free DALL-E powered image generation",
        &["image", "picture", "generate", "art"],
        "https://www.bing.com/images/create",
    ),
    (
        "remove-bg",
        "remove.bg",
        Category::Image,
        "Remove photo backgrounds in one click",
        &["background", "remove", "photo", "edit"],
        "https://www.remove.bg",
    ),
    (
        "upscayl",
        "Upscayl",
        Category::Image,
        "Open-source image upscaler",
        &["upscale", "photo", "image"],
        "https://upscayl.org",
    ),
    // ── Video ──
    (
        "capcut",
        "CapCut",
        Category::Video,
        "Edit short videos, reels and tiktoks with templates",
        &["video", "edit", "reel", "tiktok", "short", "trim"],
        "https://www.capcut.com",
    ),
    (
        "runway",
        "Runway",
        Category::Video,
        "Text and image to video generation with motion tools",
        &["video", "motion", "generate", "vfx"],
        "https://runwayml.com",
    ),
    (
        "pika",
        "Pika",
        Category::Video,
        "Turn prompts and images into short animated clips",
        &["video", "animation", "clip"],
        "https://pika.art",
    ),
    // ── Writing ──
    (
        "quillbot",
        "QuillBot",
        Category::Writing,
        "Paraphrase, summarize and fix grammar",
        &["grammar", "summary", "paraphrase", "proofread"],
        "https://quillbot.com",
    ),
    (
        "grammarly",
        "Grammarly",
        Category::Writing,
        "Grammar and spelling checker for essays and email",
        &["grammar", "spell", "check", "email", "essay"],
        "https://www.grammarly.com",
    ),
    (
        "deepl",
        "DeepL Translator",
        Category::Writing,
        "High quality translation for text and documents",
        &["translate", "text", "document"],
        "https://www.deepl.com/translator",
    ),
    // ── Code ──
    (
        "github-copilot",
        "GitHub Copilot",
        Category::Code,
        "AI pair programmer inside your editor",
        &["code", "program", "autocomplete"],
        "https://github.com/features/copilot",
    ),
    (
        "replit",
        "Replit",
        Category::Code,
        "Build and deploy apps in the browser with an AI agent",
        &["code", "app", "web", "python", "deploy"],
        "https://replit.com",
    ),
    (
        "v0",
        "v0",
        Category::Code,
        "Generate React and Next.js UI from prompts",
        &["react", "next", "web", "ui", "html", "css"],
        "https://v0.dev",
    ),
    // ── Audio ──
    (
        "suno",
        "Suno",
        Category::Audio,
        "Create full songs with vocals from a prompt",
        &["music", "song", "generate"],
        "https://suno.com",
    ),
    (
        "elevenlabs",
        "ElevenLabs",
        Category::Audio,
        "Realistic text to speech and voice cloning",
        &["voice", "tts", "speech", "narration"],
        "https://elevenlabs.io",
    ),
    (
        "whisper-web",
        "Whisper Web",
        Category::Audio,
        "Speech to text transcription in the browser",
        &["stt", "transcription", "audio"],
        "https://huggingface.co/spaces/Xenova/whisper-web",
    ),
    // ── Productivity ──
    (
        "notion-ai",
        "Notion AI",
        Category::Productivity,
        "Notes, docs and project planning with an assistant",
        &["note", "document", "project", "plan", "task"],
        "https://www.notion.so/product/ai",
    ),
    (
        "gamma",
        "Gamma",
        Category::Productivity,
        "Generate presentations, slide decks and pitch docs",
        &["presentation", "slide", "deck", "pitch"],
        "https://gamma.app",
    ),
    (
        "motion",
        "Motion",
        Category::Productivity,
        "Auto-schedule tasks and meetings on your calendar",
        &["schedule", "task", "organize"],
        "https://www.usemotion.com",
    ),
    // ── Design ──
    (
        "canva",
        "Canva",
        Category::Design,
        "Design posters, banners, thumbnails and social posts",
        &["design", "poster", "banner", "thumbnail", "logo"],
        "https://www.canva.com",
    ),
    (
        "coolors",
        "Coolors",
        Category::Design,
        "Color palette generator",
        &["color", "palette", "gradient"],
        "https://coolors.co",
    ),
    (
        "uizard",
        "Uizard",
        Category::Design,
        "Turn sketches into UI mockups",
        &["ui", "ux", "layout", "interface", "sketch"],
        "https://uizard.io",
    ),
    // ── Chat ──
    (
        "chatgpt",
        "ChatGPT",
        Category::Chat,
        "General purpose AI assistant",
        &["chat", "assistant", "write"],
        "https://chatgpt.com",
    ),
    (
        "gemini",
        "Gemini",
        Category::Chat,
        "Google's AI assistant",
        &["chat", "assistant", "search"],
        "https://gemini.google.com",
    ),
    (
        "claude",
        "Claude",
        Category::Chat,
        "Assistant for long documents and careful reasoning",
        &["chat", "assistant", "document"],
        "https://claude.ai",
    ),
];

pub(super) fn builtin_tools() -> Vec<ToolEntry> {
    TOOLS
        .iter()
        .map(|(id, name, category, description, tags, url)| ToolEntry {
            id: (*id).to_string(),
            name: (*name).to_string(),
            category: *category,
            description: (*description).to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            url: (*url).to_string(),
        })
        .collect()
}
