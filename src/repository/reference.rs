use diesel::prelude::*;

use crate::domain::reference::{NewReference, Reference, ReferenceUpdate};
use crate::domain::types::{ReferenceId, Slug};
use crate::models::reference::{
    NewReference as DbNewReference, Reference as DbReference, ReferenceChangeset,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ReferenceListQuery, ReferenceReader, ReferenceWriter};

impl ReferenceReader for DieselRepository {
    fn list_references(
        &self,
        query: ReferenceListQuery,
    ) -> RepositoryResult<(usize, Vec<Reference>)> {
        use crate::schema::reference_items;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = reference_items::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(tag) = &query.tag {
                items = items.filter(reference_items::tags.like(format!("%\"{tag}\"%")));
            }

            if let Some(format) = query.format {
                items = items.filter(reference_items::format.eq(format.as_str()));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let items = items
            .order(reference_items::created_at.desc())
            .load::<DbReference>(&mut conn)?
            .into_iter()
            .map(|row| Reference::try_from(row).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<Reference>>>()?;

        Ok((total, items))
    }

    fn get_reference_by_id(&self, id: ReferenceId) -> RepositoryResult<Option<Reference>> {
        use crate::schema::reference_items;

        let mut conn = self.conn()?;

        let row = reference_items::table
            .find(id.get())
            .first::<DbReference>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(Some(Reference::try_from(row)?)),
            None => Ok(None),
        }
    }

    fn get_reference_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Reference>> {
        use crate::schema::reference_items;

        let mut conn = self.conn()?;

        let row = reference_items::table
            .filter(reference_items::slug.eq(slug.as_str()))
            .first::<DbReference>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(Some(Reference::try_from(row)?)),
            None => Ok(None),
        }
    }
}

impl ReferenceWriter for DieselRepository {
    fn create_reference(&self, reference: &NewReference) -> RepositoryResult<Reference> {
        use crate::schema::reference_items;

        let mut conn = self.conn()?;

        let row = diesel::insert_into(reference_items::table)
            .values(DbNewReference::from(reference))
            .get_result::<DbReference>(&mut conn)?;

        Ok(Reference::try_from(row)?)
    }

    fn update_reference(
        &self,
        id: ReferenceId,
        update: &ReferenceUpdate,
    ) -> RepositoryResult<Reference> {
        use crate::schema::reference_items;

        let mut conn = self.conn()?;

        let updated = diesel::update(reference_items::table.find(id.get()))
            .set(ReferenceChangeset::from(update))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        let row = reference_items::table
            .find(id.get())
            .first::<DbReference>(&mut conn)?;
        Ok(Reference::try_from(row)?)
    }

    fn delete_reference(&self, id: ReferenceId) -> RepositoryResult<usize> {
        use crate::schema::reference_items;

        let mut conn = self.conn()?;

        Ok(diesel::delete(reference_items::table.find(id.get())).execute(&mut conn)?)
    }
}
