//! Related-post ranking over enriched records.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::post::Post;

/// Number of related posts returned when the caller does not ask otherwise.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

// Hand-tuned weights. These are not a formal similarity metric; changing
// them changes the published "related posts" ordering of existing content.
const SHARED_TAG_WEIGHT: f64 = 3.0;
const CONTENT_TYPE_WEIGHT: f64 = 2.0;
const READING_TIME_WEIGHT: f64 = 1.0;
const RECENCY_WEIGHT: f64 = 0.5;

/// Candidates within this many minutes of the pivot's reading time get the
/// reading-time bonus.
const READING_TIME_WINDOW_MINUTES: u32 = 2;
/// Candidates published within this many whole days of the pivot get the
/// recency bonus.
const RECENCY_WINDOW_DAYS: i64 = 30;

/// A candidate post together with its transient similarity score.
///
/// Produced only by [`find_related`], never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPost {
    #[serde(flatten)]
    pub post: Post,
    pub similarity_score: f64,
}

/// Rank the pool against a pivot post and return the best matches.
///
/// The pivot itself (matched by id) and candidates scoring zero are
/// excluded. The sort is stable and descends by score, so equal-scoring
/// candidates keep their pool order; the result is truncated to `limit`.
pub fn find_related(current: &Post, pool: &[Post], limit: usize) -> Vec<ScoredPost> {
    if pool.len() <= 1 {
        return Vec::new();
    }

    let current_tags: HashSet<&str> = current.tags.iter().map(String::as_str).collect();

    let mut related: Vec<ScoredPost> = pool
        .iter()
        .filter(|post| post.id != current.id)
        .filter_map(|post| {
            let score = score_candidate(current, &current_tags, post);
            (score > 0.0).then(|| ScoredPost {
                post: post.clone(),
                similarity_score: score,
            })
        })
        .collect();

    related.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    related.truncate(limit);
    related
}

fn score_candidate(current: &Post, current_tags: &HashSet<&str>, candidate: &Post) -> f64 {
    let mut score = 0.0;

    // Shared tags carry the highest weight. Set semantics: duplicate tags
    // count once.
    let candidate_tags: HashSet<&str> = candidate.tags.iter().map(String::as_str).collect();
    let shared_tags = current_tags.intersection(&candidate_tags).count();
    score += SHARED_TAG_WEIGHT * shared_tags as f64;

    if candidate.meta.content_type == current.meta.content_type {
        score += CONTENT_TYPE_WEIGHT;
    }

    let time_diff = candidate
        .meta
        .reading_time
        .abs_diff(current.meta.reading_time);
    if time_diff <= READING_TIME_WINDOW_MINUTES {
        score += READING_TIME_WEIGHT;
    }

    let days_apart = (candidate.pub_date - current.pub_date).num_days().abs();
    if days_apart <= RECENCY_WINDOW_DAYS {
        score += RECENCY_WEIGHT;
    }

    score
}
