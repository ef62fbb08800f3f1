//! Markdown repair and table-of-contents extraction.
//!
//! Post bodies arrive from a rich-text editor that occasionally
//! double-escapes link syntax when round-tripping markdown. These helpers
//! normalize such bodies for display and derive a heading outline.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::content::text::slugify;

// `\[[text](url)\]([url](url))` -> `[text](url)`
static RE_DOUBLE_ESCAPED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\?\\\[\[([^\]]+)\]\(([^)]+)\)\\?\\\]\(\[[^\]]+\]\([^)]+\)\)").unwrap()
});

// `\[text\]([url](url))` -> `[text](url)`
static RE_ESCAPED_LINK_NESTED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\?\\\[([^\]]+)\\?\\\]\(\[([^\]]+)\]\(([^)]+)\)\)").unwrap()
});

// `\[text\](url)` -> `[text](url)`
static RE_ESCAPED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\?\\\[([^\]]+)\\?\\\]\(([^)]+)\)").unwrap()
});

// Residual escapes in front of brackets or parentheses.
static RE_STRAY_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\([\[\]()])").unwrap()
});

static RE_ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(#{1,6})[ \t]+(.+?)[ \t#]*$").unwrap()
});

/// Undo double-escaped link syntax and stray bracket escapes.
pub fn preprocess_markdown(content: &str) -> String {
    let content = RE_DOUBLE_ESCAPED_LINK.replace_all(content, "[$1]($2)");
    let content = RE_ESCAPED_LINK_NESTED_URL.replace_all(&content, "[$1]($3)");
    let content = RE_ESCAPED_LINK.replace_all(&content, "[$1]($2)");
    RE_STRAY_ESCAPE.replace_all(&content, "$1").into_owned()
}

/// One entry of a post's heading outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    /// Anchor id, slugified from the heading text.
    pub id: String,
    pub text: String,
    pub level: u8,
    pub children: Vec<TocItem>,
}

/// Extract ATX headings from markdown as a flat outline in document order.
pub fn extract_headings(markdown: &str) -> Vec<TocItem> {
    RE_ATX_HEADING
        .captures_iter(markdown)
        .map(|caps| {
            let text = caps[2].trim().to_string();
            TocItem {
                id: slugify(&text),
                level: caps[1].len() as u8,
                text,
                children: Vec::new(),
            }
        })
        .collect()
}

/// Nest a flat heading list by level: each heading owns the following
/// deeper headings until one at its own level or above appears.
pub fn build_nested_toc(flat: Vec<TocItem>) -> Vec<TocItem> {
    fn build(
        items: &mut std::iter::Peekable<std::vec::IntoIter<TocItem>>,
        parent_level: u8,
    ) -> Vec<TocItem> {
        let mut nested = Vec::new();
        while let Some(level) = items.peek().map(|item| item.level) {
            if level <= parent_level {
                break;
            }
            let Some(mut node) = items.next() else { break };
            node.children = build(items, node.level);
            nested.push(node);
        }
        nested
    }

    build(&mut flat.into_iter().peekable(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_fixes_simple_escaped_links() {
        assert_eq!(
            preprocess_markdown(r"see \[docs\](https://example.com)"),
            "see [docs](https://example.com)"
        );
    }

    #[test]
    fn preprocess_fixes_links_with_nested_url() {
        assert_eq!(
            preprocess_markdown(r"\[docs\]([https://example.com](https://example.com))"),
            "[docs](https://example.com)"
        );
    }

    #[test]
    fn preprocess_removes_stray_bracket_escapes() {
        assert_eq!(preprocess_markdown(r"a \[ b \) c"), "a [ b ) c");
    }

    #[test]
    fn preprocess_leaves_valid_markdown_untouched() {
        let valid = "# Title\n\n[docs](https://example.com) and `code`.";
        assert_eq!(preprocess_markdown(valid), valid);
    }

    #[test]
    fn extract_headings_captures_level_text_and_anchor() {
        let markdown = "# Top\n\nbody\n\n## Deeper Dive\n\n### Fine Print!";
        let headings = extract_headings(markdown);
        assert_eq!(headings.len(), 3);
        assert_eq!(headings[0].level, 1);
        assert_eq!(headings[1].text, "Deeper Dive");
        assert_eq!(headings[1].id, "deeper-dive");
        assert_eq!(headings[2].id, "fine-print");
    }

    #[test]
    fn extract_headings_ignores_non_heading_hashes() {
        let markdown = "not # a heading\n#tag-like\n# Real";
        let headings = extract_headings(markdown);
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real");
    }

    #[test]
    fn nested_toc_groups_by_level() {
        let markdown = "# A\n## A1\n### A1a\n## A2\n# B";
        let toc = build_nested_toc(extract_headings(markdown));
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].text, "A");
        assert_eq!(toc[0].children.len(), 2);
        assert_eq!(toc[0].children[0].children[0].text, "A1a");
        assert_eq!(toc[1].text, "B");
        assert!(toc[1].children.is_empty());
    }

    #[test]
    fn nested_toc_handles_skipping_levels() {
        let markdown = "### Deep Start\n# Shallow";
        let toc = build_nested_toc(extract_headings(markdown));
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].text, "Deep Start");
        assert_eq!(toc[1].text, "Shallow");
    }
}
