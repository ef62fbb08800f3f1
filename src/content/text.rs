//! Text-cleaning helpers shared by the enricher and slug derivation.

use std::sync::LazyLock;

use regex::Regex;

static RE_FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```.*?```").unwrap()
});

static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`]*`").unwrap()
});

static RE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap()
});

static RE_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[#*_~`]").unwrap()
});

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").unwrap()
});

static RE_SLUG_INVALID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9_\s-]").unwrap()
});

static RE_SLUG_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s_-]+").unwrap()
});

/// Strip markdown structure from a post body, leaving plain prose.
///
/// Fenced code blocks and inline code spans are removed entirely (code is
/// not prose), links keep their text, emphasis/heading/strike markers are
/// dropped, and whitespace runs collapse to single spaces.
pub fn clean_markup(content: &str) -> String {
    let cleaned = RE_FENCED_CODE.replace_all(content, "");
    let cleaned = RE_INLINE_CODE.replace_all(&cleaned, "");
    let cleaned = RE_LINK.replace_all(&cleaned, "$1");
    let cleaned = RE_MARKERS.replace_all(&cleaned, "");
    let cleaned = RE_WHITESPACE.replace_all(&cleaned, " ");
    cleaned.trim().to_string()
}

/// Derive a URL-safe slug from free-form text.
///
/// Lowercases, drops everything outside ASCII letters/digits/underscores/
/// spaces/hyphens, then collapses separator runs to single hyphens.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = RE_SLUG_INVALID.replace_all(&lowered, "");
    let hyphenated = RE_SLUG_SEPARATORS.replace_all(stripped.trim(), "-");
    hyphenated.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_markup_removes_fenced_code_blocks() {
        let input = "Intro\n```rust\nfn main() {}\n```\nOutro";
        assert_eq!(clean_markup(input), "Intro Outro");
    }

    #[test]
    fn clean_markup_removes_inline_code_spans() {
        assert_eq!(clean_markup("run `cargo doc` today"), "run today");
    }

    #[test]
    fn clean_markup_keeps_link_text_only() {
        assert_eq!(
            clean_markup("see [the docs](https://example.com) here"),
            "see the docs here"
        );
    }

    #[test]
    fn clean_markup_strips_emphasis_and_heading_markers() {
        assert_eq!(
            clean_markup("# Title\n\nSome **bold** and _italic_ and ~~gone~~"),
            "Title Some bold and italic and gone"
        );
    }

    #[test]
    fn clean_markup_collapses_whitespace_runs() {
        assert_eq!(clean_markup("a\n\n\nb   c\t\td"), "a b c d");
    }

    #[test]
    fn clean_markup_of_empty_input_is_empty() {
        assert_eq!(clean_markup(""), "");
        assert_eq!(clean_markup("   \n\t "), "");
    }

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("My First Post"), "my-first-post");
    }

    #[test]
    fn slugify_drops_special_characters() {
        assert_eq!(slugify("Hello, World! (2024)"), "hello-world-2024");
    }

    #[test]
    fn slugify_collapses_separator_runs() {
        assert_eq!(slugify("a  -  b___c"), "a-b-c");
    }

    #[test]
    fn slugify_trims_leading_and_trailing_hyphens() {
        assert_eq!(slugify("--edge case--"), "edge-case");
    }

    #[test]
    fn slugify_of_only_special_characters_is_empty() {
        assert_eq!(slugify("???"), "");
    }
}
