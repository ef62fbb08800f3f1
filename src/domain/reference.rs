use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ReferenceFormat, ReferenceId, ReferenceTitle, Slug};

/// A portfolio reference: a link, snippet or write-up outside the blog
/// timeline. Not a content record, so it carries no derived metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub id: ReferenceId,
    pub title: ReferenceTitle,
    pub description: Option<String>,
    pub format: ReferenceFormat,
    pub tags: Vec<String>,
    pub content: String,
    pub slug: Slug,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Information required to create a new [`Reference`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewReference {
    pub title: ReferenceTitle,
    pub description: Option<String>,
    pub format: ReferenceFormat,
    pub tags: Vec<String>,
    pub content: String,
    pub slug: Slug,
}

/// Partial update of a [`Reference`]. Absent fields are left untouched;
/// the slug is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferenceUpdate {
    pub title: Option<ReferenceTitle>,
    pub description: Option<String>,
    pub format: Option<ReferenceFormat>,
    pub tags: Option<Vec<String>>,
    pub content: Option<String>,
}
