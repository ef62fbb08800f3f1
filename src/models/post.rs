use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::content::meta::enrich;
use crate::domain::post::{NewPost as DomainNewPost, Post as DomainPost, PostUpdate};
use crate::domain::types::{AuthorName, ImageUrl, PostId, PostTitle, Slug, TypeConstraintError};

/// Diesel row for the `posts` table. Tags are stored as a JSON array in a
/// text column.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::posts)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub pub_date: NaiveDate,
    pub tags: String,
    pub content: String,
    pub slug: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Post> for DomainPost {
    type Error = TypeConstraintError;

    /// The single path out of the posts repository. Enrichment happens
    /// here so no caller can ever observe an un-enriched record.
    fn try_from(post: Post) -> Result<Self, Self::Error> {
        let tags: Vec<String> = serde_json::from_str(&post.tags).unwrap_or_default();
        let meta = enrich(&post.content, post.description.as_deref());

        Ok(Self {
            id: PostId::new(post.id)?,
            title: PostTitle::new(post.title)?,
            author: AuthorName::new(post.author)?,
            description: post.description,
            image_url: post.image_url.map(ImageUrl::new).transpose()?,
            image_alt: post.image_alt,
            pub_date: post.pub_date,
            tags,
            content: post.content,
            slug: Slug::new(post.slug)?,
            created_at: post.created_at,
            updated_at: post.updated_at,
            meta,
        })
    }
}

/// Insertable form of a post.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub pub_date: NaiveDate,
    pub tags: String,
    pub content: String,
    pub slug: String,
}

impl From<&DomainNewPost> for NewPost {
    fn from(value: &DomainNewPost) -> Self {
        Self {
            title: value.title.as_str().to_string(),
            author: value.author.as_str().to_string(),
            description: value.description.clone(),
            image_url: value.image_url.as_ref().map(|url| url.as_str().to_string()),
            image_alt: value.image_alt.clone(),
            pub_date: value.pub_date,
            tags: encode_tags(&value.tags),
            content: value.content.clone(),
            slug: value.slug.as_str().to_string(),
        }
    }
}

/// Patch form of a post; `updated_at` is always bumped so the changeset is
/// never empty.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::posts)]
pub struct PostChangeset {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub pub_date: Option<NaiveDate>,
    pub tags: Option<String>,
    pub content: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<&PostUpdate> for PostChangeset {
    fn from(value: &PostUpdate) -> Self {
        Self {
            title: value.title.as_ref().map(|t| t.as_str().to_string()),
            author: value.author.as_ref().map(|a| a.as_str().to_string()),
            description: value.description.clone(),
            image_url: value.image_url.as_ref().map(|url| url.as_str().to_string()),
            image_alt: value.image_alt.clone(),
            pub_date: value.pub_date,
            tags: value.tags.as_deref().map(encode_tags),
            content: value.content.clone(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

pub(crate) fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| String::from("[]"))
}
