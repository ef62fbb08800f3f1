//! Metadata enrichment: reading time, word count, excerpt and content type.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::content::text::clean_markup;

/// Characters of raw body text counted as one minute of reading.
///
/// A crude character-based proxy rather than a words-per-minute model;
/// kept as-is because derived reading times feed the ranker and the
/// published classification of existing content.
pub const CHARS_PER_MINUTE: usize = 1_000;

/// Maximum excerpt length in characters, before the ellipsis.
pub const EXCERPT_MAX_CHARS: usize = 150;

/// Classification of a post by its estimated reading time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Short reads, up to 2 minutes.
    Note,
    /// Medium reads, 3-5 minutes.
    Post,
    /// Longer reads, 6-10 minutes.
    Tutorial,
    /// Very long reads, 11+ minutes.
    Guide,
}

impl ContentType {
    /// Classify a reading time in minutes. Thresholds are inclusive.
    pub const fn from_reading_time(minutes: u32) -> Self {
        if minutes <= 2 {
            Self::Note
        } else if minutes <= 5 {
            Self::Post
        } else if minutes <= 10 {
            Self::Tutorial
        } else {
            Self::Guide
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Post => "post",
            Self::Tutorial => "tutorial",
            Self::Guide => "guide",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presentation metadata derived from a post body and description.
///
/// Never persisted: the repository recomputes this on every read, so two
/// reads of the same record always agree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostMeta {
    pub word_count: usize,
    /// Estimated reading time in minutes, always at least 1.
    pub reading_time: u32,
    pub excerpt: String,
    pub content_type: ContentType,
}

/// Estimated reading time in whole minutes, floored, with a minimum of 1.
pub fn reading_time(content: &str) -> u32 {
    (content.chars().count() / CHARS_PER_MINUTE).max(1) as u32
}

/// Derive presentation metadata from a raw body and optional description.
///
/// Total function: empty or malformed markup degrades to zero counts and an
/// empty excerpt rather than an error.
pub fn enrich(content: &str, description: Option<&str>) -> PostMeta {
    let reading_time = reading_time(content);
    let cleaned = clean_markup(content);
    let word_count = cleaned.split(' ').filter(|word| !word.is_empty()).count();
    let excerpt = match description {
        Some(description) if !description.is_empty() => description.to_string(),
        _ => excerpt_of(&cleaned),
    };

    PostMeta {
        word_count,
        reading_time,
        excerpt,
        content_type: ContentType::from_reading_time(reading_time),
    }
}

/// Word-boundary-safe truncation of cleaned text to the excerpt limit.
fn excerpt_of(cleaned: &str) -> String {
    if cleaned.chars().count() <= EXCERPT_MAX_CHARS {
        return cleaned.to_string();
    }

    let head: String = cleaned.chars().take(EXCERPT_MAX_CHARS).collect();
    let mut words: Vec<&str> = head.split(' ').collect();
    // The last token is likely cut mid-word; drop it.
    words.pop();
    format!("{}...", words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrichment_is_deterministic() {
        let content = "# Heading\n\nSome *styled* text with a [link](https://example.com).";
        assert_eq!(enrich(content, None), enrich(content, None));
    }

    #[test]
    fn reading_time_has_a_floor_of_one_minute() {
        assert_eq!(reading_time(""), 1);
        assert_eq!(reading_time("short"), 1);
    }

    #[test]
    fn reading_time_floors_character_count() {
        assert_eq!(reading_time(&"x".repeat(1_999)), 1);
        assert_eq!(reading_time(&"x".repeat(2_000)), 2);
        assert_eq!(reading_time(&"x".repeat(12_345)), 12);
    }

    #[test]
    fn content_type_thresholds_are_inclusive() {
        assert_eq!(ContentType::from_reading_time(2), ContentType::Note);
        assert_eq!(ContentType::from_reading_time(3), ContentType::Post);
        assert_eq!(ContentType::from_reading_time(5), ContentType::Post);
        assert_eq!(ContentType::from_reading_time(10), ContentType::Tutorial);
        assert_eq!(ContentType::from_reading_time(11), ContentType::Guide);
    }

    #[test]
    fn enrich_classifies_from_derived_reading_time() {
        let meta = enrich(&"word ".repeat(700), None); // 3500 chars -> 3 min
        assert_eq!(meta.reading_time, 3);
        assert_eq!(meta.content_type, ContentType::Post);
    }

    #[test]
    fn empty_content_degrades_to_zero_counts() {
        let meta = enrich("", None);
        assert_eq!(meta.word_count, 0);
        assert_eq!(meta.reading_time, 1);
        assert_eq!(meta.excerpt, "");
        assert_eq!(meta.content_type, ContentType::Note);
    }

    #[test]
    fn word_count_ignores_code_and_link_urls() {
        let content = "Intro `code` [docs](https://a.very/long/url) end\n```\nignored\n```";
        assert_eq!(enrich(content, None).word_count, 3); // Intro docs end
    }

    #[test]
    fn description_takes_precedence_over_content() {
        let long_body = "word ".repeat(200);
        let meta = enrich(&long_body, Some("A hand-written summary."));
        assert_eq!(meta.excerpt, "A hand-written summary.");
    }

    #[test]
    fn empty_description_falls_back_to_content() {
        let meta = enrich("A tiny body.", Some(""));
        assert_eq!(meta.excerpt, "A tiny body.");
    }

    #[test]
    fn short_content_is_used_verbatim_as_excerpt() {
        let meta = enrich("Just a few words here.", None);
        assert_eq!(meta.excerpt, "Just a few words here.");
    }

    #[test]
    fn long_content_truncates_on_a_word_boundary() {
        let body = "alpha bravo charlie delta ".repeat(20);
        let meta = enrich(&body, None);
        assert!(meta.excerpt.ends_with("..."));
        let trimmed = meta.excerpt.trim_end_matches("...");
        assert!(trimmed.chars().count() <= EXCERPT_MAX_CHARS);
        // Every word in the excerpt must be a complete word of the source.
        for word in trimmed.split(' ') {
            assert!(["alpha", "bravo", "charlie", "delta"].contains(&word));
        }
    }

    #[test]
    fn single_unbroken_word_truncates_to_ellipsis_only() {
        let meta = enrich(&"a".repeat(400), None);
        assert_eq!(meta.excerpt, "...");
    }
}
