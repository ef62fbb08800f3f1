use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::post::PostUpdate;
use crate::domain::types::{AuthorName, ImageUrl, PostTitle, TypeConstraintError};

/// Trim tag labels and drop empty ones. Order and duplicates are preserved;
/// tags are stored as submitted.
pub(crate) fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

pub(crate) fn parse_pub_date(value: &str) -> Result<NaiveDate, PostFormError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| PostFormError::InvalidDate(value.to_string()))
}

/// JSON body accepted by `POST /v1/posts`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostForm {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author: String,
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    /// ISO 8601 date; defaults to today when absent.
    pub pub_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(length(min = 1))]
    pub content: String,
}

/// Validated, strongly-typed form of [`CreatePostForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePostPayload {
    pub title: PostTitle,
    pub author: AuthorName,
    pub description: Option<String>,
    pub image_url: Option<ImageUrl>,
    pub image_alt: Option<String>,
    pub pub_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum PostFormError {
    #[error("Post form validation failed: {0}")]
    Validation(String),
    #[error("Post form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Post form date must be ISO 8601 (YYYY-MM-DD), got: {0}")]
    InvalidDate(String),
}

impl From<ValidationErrors> for PostFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PostFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CreatePostForm> for CreatePostPayload {
    type Error = PostFormError;

    fn try_from(form: CreatePostForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            title: PostTitle::new(form.title)?,
            author: AuthorName::new(form.author)?,
            description: form.description,
            image_url: form.image_url.map(ImageUrl::new).transpose()?,
            image_alt: form.image_alt,
            pub_date: form.pub_date.as_deref().map(parse_pub_date).transpose()?,
            tags: normalize_tags(form.tags),
            content: form.content,
        })
    }
}

/// JSON body accepted by `PUT /v1/posts/{id}`. Absent fields are left
/// untouched; the slug cannot be changed.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub pub_date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub content: Option<String>,
}

impl TryFrom<UpdatePostForm> for PostUpdate {
    type Error = PostFormError;

    fn try_from(form: UpdatePostForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            title: form.title.map(PostTitle::new).transpose()?,
            author: form.author.map(AuthorName::new).transpose()?,
            description: form.description,
            image_url: form.image_url.map(ImageUrl::new).transpose()?,
            image_alt: form.image_alt,
            pub_date: form.pub_date.as_deref().map(parse_pub_date).transpose()?,
            tags: form.tags.map(normalize_tags),
            content: form.content,
        })
    }
}
