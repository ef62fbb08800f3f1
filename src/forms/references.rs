use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::reference::ReferenceUpdate;
use crate::domain::types::{ReferenceFormat, ReferenceTitle, TypeConstraintError};
use crate::forms::posts::normalize_tags;

/// JSON body accepted by `POST /v1/references`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReferenceForm {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    /// One of `markdown`, `html`, `plaintext`; defaults to markdown.
    pub format: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(length(min = 1))]
    pub content: String,
}

/// Validated, strongly-typed form of [`CreateReferenceForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReferencePayload {
    pub title: ReferenceTitle,
    pub description: Option<String>,
    pub format: ReferenceFormat,
    pub tags: Vec<String>,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum ReferenceFormError {
    #[error("Reference form validation failed: {0}")]
    Validation(String),
    #[error("Reference form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ReferenceFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ReferenceFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CreateReferenceForm> for CreateReferencePayload {
    type Error = ReferenceFormError;

    fn try_from(form: CreateReferenceForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let format = match form.format.as_deref() {
            Some(format) => ReferenceFormat::try_from(format)?,
            None => ReferenceFormat::default(),
        };

        Ok(Self {
            title: ReferenceTitle::new(form.title)?,
            description: form.description,
            format,
            tags: normalize_tags(form.tags),
            content: form.content,
        })
    }
}

/// JSON body accepted by `PUT /v1/references/{id}`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateReferenceForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub tags: Option<Vec<String>>,
    pub content: Option<String>,
}

impl TryFrom<UpdateReferenceForm> for ReferenceUpdate {
    type Error = ReferenceFormError;

    fn try_from(form: UpdateReferenceForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            title: form.title.map(ReferenceTitle::new).transpose()?,
            description: form.description,
            format: form
                .format
                .as_deref()
                .map(ReferenceFormat::try_from)
                .transpose()?,
            tags: form.tags.map(normalize_tags),
            content: form.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_markdown() {
        let payload = CreateReferencePayload::try_from(CreateReferenceForm {
            title: "Snippets".to_string(),
            description: None,
            format: None,
            tags: vec![],
            content: "x".to_string(),
        })
        .unwrap();
        assert_eq!(payload.format, ReferenceFormat::Markdown);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = CreateReferencePayload::try_from(CreateReferenceForm {
            title: "Snippets".to_string(),
            description: None,
            format: Some("docx".to_string()),
            tags: vec![],
            content: "x".to_string(),
        });
        assert!(matches!(
            result,
            Err(ReferenceFormError::TypeConstraint(_))
        ));
    }
}
