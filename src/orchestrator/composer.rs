//! Assistant reply text.

use crate::catalog::ToolEntry;

/// Appended when the answer came from the offline keyword match.
pub const QUICK_MATCH_NOTICE: &str = "_(Using quick match - AI detection unavailable right now)_";

/// Stored in place of a reply when classification fails.
pub const APOLOGY: &str = "Something went wrong. Please try again!";

/// Reply for a classified request.
///
/// With at least one resolved tool the reply names each one in bold and
/// points at the highlighted panel; the quick-match notice is added only
/// when no remote answer was used. Without tools it falls back to a
/// generic line naming the category.
pub fn compose_reply(
    content: &str,
    category: &str,
    tools: &[&ToolEntry],
    used_remote_service: bool,
) -> String {
    if tools.is_empty() {
        return format!("I'll help with that! Let me show you the best AI tools for **{category}**.");
    }

    let names = tools
        .iter()
        .map(|t| format!("**{}**", t.name))
        .collect::<Vec<_>>()
        .join(", ");
    let mut reply = format!(
        "Got it! For \"{content}\", the best tools are: {names}\n\nI've highlighted them in the tools panel \u{2192}"
    );
    if !used_remote_service {
        reply.push_str("\n\n");
        reply.push_str(QUICK_MATCH_NOTICE);
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{tool, Category};

    #[test]
    fn names_tools_in_bold() {
        let a = tool("leo", "Leonardo", Category::Image, &[]);
        let b = tool("bing", "Bing Image Creator", Category::Image, &[]);
        let reply = compose_reply("anime image", "image", &[&a, &b], true);
        assert!(reply.starts_with("Got it! For \"anime image\", the best tools are: "));
        assert!(reply.contains("**Leonardo**, **Bing Image Creator**"));
        assert!(reply.contains("highlighted them in the tools panel"));
        assert!(!reply.contains(QUICK_MATCH_NOTICE));
    }

    #[test]
    fn quick_match_notice_only_for_local_answers() {
        let a = tool("leo", "Leonardo", Category::Image, &[]);
        let reply = compose_reply("anime image", "image", &[&a], false);
        assert!(reply.ends_with(QUICK_MATCH_NOTICE));
    }

    #[test]
    fn generic_reply_without_tools() {
        let reply = compose_reply("hello there", "chat", &[], false);
        assert_eq!(
            reply,
            "I'll help with that! Let me show you the best AI tools for **chat**."
        );
    }
}
