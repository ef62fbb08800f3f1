use crate::content::text::slugify;
use crate::domain::reference::{NewReference, Reference, ReferenceUpdate};
use crate::domain::types::{ReferenceFormat, ReferenceId, Slug};
use crate::forms::references::CreateReferencePayload;
use crate::repository::{ReferenceListQuery, ReferenceReader, ReferenceWriter};

use super::{ServiceError, ServiceResult};

/// List references, optionally filtered by tag or source format.
pub fn list_references<R>(
    tag: Option<&str>,
    format: Option<ReferenceFormat>,
    repo: &R,
) -> ServiceResult<Vec<Reference>>
where
    R: ReferenceReader,
{
    let mut query = ReferenceListQuery::default();
    if let Some(tag) = tag {
        query = query.tag(tag);
    }
    if let Some(format) = format {
        query = query.format(format);
    }

    match repo.list_references(query) {
        Ok((_total, references)) => Ok(references),
        Err(e) => {
            log::error!("Failed to list references: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a single reference by its numeric identifier.
pub fn get_reference<R>(id: i32, repo: &R) -> ServiceResult<Reference>
where
    R: ReferenceReader,
{
    let id = match ReferenceId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_reference_by_id(id) {
        Ok(Some(reference)) => Ok(reference),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get reference: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a single reference by its slug.
pub fn get_reference_by_slug<R>(slug: &str, repo: &R) -> ServiceResult<Reference>
where
    R: ReferenceReader,
{
    let slug = match Slug::new(slug) {
        Ok(slug) => slug,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_reference_by_slug(&slug) {
        Ok(Some(reference)) => Ok(reference),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get reference by slug: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Create a reference, deriving its slug from the title.
pub fn create_reference<R>(payload: CreateReferencePayload, repo: &R) -> ServiceResult<Reference>
where
    R: ReferenceReader + ReferenceWriter,
{
    let slug = match Slug::new(slugify(payload.title.as_str())) {
        Ok(slug) => slug,
        Err(_) => {
            return Err(ServiceError::Form(
                "title does not produce a usable slug".to_string(),
            ));
        }
    };

    match repo.get_reference_by_slug(&slug) {
        Ok(Some(_)) => {
            return Err(ServiceError::Conflict(
                "a reference with this title already exists".to_string(),
            ));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to check slug uniqueness: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let new_reference = NewReference {
        title: payload.title,
        description: payload.description,
        format: payload.format,
        tags: payload.tags,
        content: payload.content,
        slug,
    };

    match repo.create_reference(&new_reference) {
        Ok(reference) => Ok(reference),
        Err(e) => {
            log::error!("Failed to create reference: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Apply a partial update to an existing reference.
pub fn update_reference<R>(id: i32, update: ReferenceUpdate, repo: &R) -> ServiceResult<Reference>
where
    R: ReferenceReader + ReferenceWriter,
{
    let id = match ReferenceId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_reference_by_id(id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get reference: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.update_reference(id, &update) {
        Ok(reference) => Ok(reference),
        Err(e) => {
            log::error!("Failed to update reference: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Delete a reference by id.
pub fn delete_reference<R>(id: i32, repo: &R) -> ServiceResult<()>
where
    R: ReferenceReader + ReferenceWriter,
{
    let id = match ReferenceId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.delete_reference(id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete reference: {e}");
            Err(ServiceError::Internal)
        }
    }
}
