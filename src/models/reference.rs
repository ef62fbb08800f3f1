use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::domain::reference::{
    NewReference as DomainNewReference, Reference as DomainReference, ReferenceUpdate,
};
use crate::domain::types::{
    ReferenceFormat, ReferenceId, ReferenceTitle, Slug, TypeConstraintError,
};
use crate::models::post::encode_tags;

/// Diesel row for the `reference_items` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::reference_items)]
pub struct Reference {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub format: String,
    pub tags: String,
    pub content: String,
    pub slug: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Reference> for DomainReference {
    type Error = TypeConstraintError;

    fn try_from(reference: Reference) -> Result<Self, Self::Error> {
        let tags: Vec<String> = serde_json::from_str(&reference.tags).unwrap_or_default();

        Ok(Self {
            id: ReferenceId::new(reference.id)?,
            title: ReferenceTitle::new(reference.title)?,
            description: reference.description,
            format: ReferenceFormat::try_from(reference.format)?,
            tags,
            content: reference.content,
            slug: Slug::new(reference.slug)?,
            created_at: reference.created_at,
            updated_at: reference.updated_at,
        })
    }
}

/// Insertable form of a reference.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::reference_items)]
pub struct NewReference {
    pub title: String,
    pub description: Option<String>,
    pub format: String,
    pub tags: String,
    pub content: String,
    pub slug: String,
}

impl From<&DomainNewReference> for NewReference {
    fn from(value: &DomainNewReference) -> Self {
        Self {
            title: value.title.as_str().to_string(),
            description: value.description.clone(),
            format: value.format.as_str().to_string(),
            tags: encode_tags(&value.tags),
            content: value.content.clone(),
            slug: value.slug.as_str().to_string(),
        }
    }
}

/// Patch form of a reference; `updated_at` is always bumped.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::reference_items)]
pub struct ReferenceChangeset {
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub tags: Option<String>,
    pub content: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<&ReferenceUpdate> for ReferenceChangeset {
    fn from(value: &ReferenceUpdate) -> Self {
        Self {
            title: value.title.as_ref().map(|t| t.as_str().to_string()),
            description: value.description.clone(),
            format: value.format.map(|f| f.as_str().to_string()),
            tags: value.tags.as_deref().map(encode_tags),
            content: value.content.clone(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}
