use diesel::prelude::*;

use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::{PostId, Slug};
use crate::models::post::{NewPost as DbNewPost, Post as DbPost, PostChangeset};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, PostListQuery, PostReader, PostWriter};

impl PostReader for DieselRepository {
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = posts::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(tag) = &query.tag {
                // Tags live in a JSON array column; a quoted LIKE match is
                // enough for exact labels.
                items = items.filter(posts::tags.like(format!("%\"{tag}\"%")));
            }

            if let Some(search) = &query.search {
                let pattern = format!("%{search}%");
                items = items.filter(
                    posts::title
                        .like(pattern.clone())
                        .or(posts::content.like(pattern)),
                );
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
            .order(posts::pub_date.desc())
            .load::<DbPost>(&mut conn)?
            .into_iter()
            .map(|row| Post::try_from(row).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<Post>>>()?;

        Ok((total, items))
    }

    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let row = posts::table
            .find(id.get())
            .first::<DbPost>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(Some(Post::try_from(row)?)),
            None => Ok(None),
        }
    }

    fn get_post_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Post>> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let row = posts::table
            .filter(posts::slug.eq(slug.as_str()))
            .first::<DbPost>(&mut conn)
            .optional()?;

        match row {
            Some(row) => Ok(Some(Post::try_from(row)?)),
            None => Ok(None),
        }
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let row = diesel::insert_into(posts::table)
            .values(DbNewPost::from(post))
            .get_result::<DbPost>(&mut conn)?;

        Ok(Post::try_from(row)?)
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<Post> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        let updated = diesel::update(posts::table.find(id.get()))
            .set(PostChangeset::from(update))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        let row = posts::table.find(id.get()).first::<DbPost>(&mut conn)?;
        Ok(Post::try_from(row)?)
    }

    fn delete_post(&self, id: PostId) -> RepositoryResult<usize> {
        use crate::schema::posts;

        let mut conn = self.conn()?;

        Ok(diesel::delete(posts::table.find(id.get())).execute(&mut conn)?)
    }
}
