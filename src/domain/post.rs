use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::content::meta::PostMeta;
use crate::domain::types::{AuthorName, ImageUrl, PostId, PostTitle, Slug};

/// A blog post as exposed to every consumer of the repository.
///
/// Always carries derived [`PostMeta`]; raw rows never leave the storage
/// layer without enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: PostTitle,
    pub author: AuthorName,
    pub description: Option<String>,
    pub image_url: Option<ImageUrl>,
    pub image_alt: Option<String>,
    pub pub_date: NaiveDate,
    /// Label order carries no meaning; duplicates are not deduplicated
    /// in storage.
    pub tags: Vec<String>,
    pub content: String,
    pub slug: Slug,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Derived on read, never persisted.
    #[serde(flatten)]
    pub meta: PostMeta,
}

/// Information required to create a new [`Post`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPost {
    pub title: PostTitle,
    pub author: AuthorName,
    pub description: Option<String>,
    pub image_url: Option<ImageUrl>,
    pub image_alt: Option<String>,
    pub pub_date: NaiveDate,
    pub tags: Vec<String>,
    pub content: String,
    pub slug: Slug,
}

/// Partial update of a [`Post`]. Absent fields are left untouched.
///
/// There is deliberately no slug field: slugs are derived once at creation
/// and stay stable even when the title changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PostUpdate {
    pub title: Option<PostTitle>,
    pub author: Option<AuthorName>,
    pub description: Option<String>,
    pub image_url: Option<ImageUrl>,
    pub image_alt: Option<String>,
    pub pub_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
    pub content: Option<String>,
}
