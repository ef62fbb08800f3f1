use crate::db::{DbConnection, DbPool};
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::reference::{NewReference, Reference, ReferenceUpdate};
use crate::domain::types::{PostId, ReferenceFormat, ReferenceId, Slug};
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod post;
pub mod reference;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing posts.
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    /// Restrict to posts carrying this tag.
    pub tag: Option<String>,
    /// Substring search over title and body.
    pub search: Option<String>,
    /// Pagination parameters; `None` returns everything.
    pub pagination: Option<Pagination>,
}

impl PostListQuery {
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Query parameters used when listing references.
#[derive(Debug, Clone, Default)]
pub struct ReferenceListQuery {
    /// Restrict to references carrying this tag.
    pub tag: Option<String>,
    /// Restrict to references in this source format.
    pub format: Option<ReferenceFormat>,
    /// Pagination parameters; `None` returns everything.
    pub pagination: Option<Pagination>,
}

impl ReferenceListQuery {
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
    pub fn format(mut self, format: ReferenceFormat) -> Self {
        self.format = Some(format);
        self
    }
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for posts.
///
/// Contract: every returned [`Post`] is enriched; implementations must not
/// expose raw rows.
pub trait PostReader {
    /// List posts matching the supplied query, newest first, along with the
    /// total match count before pagination.
    fn list_posts(&self, query: PostListQuery) -> RepositoryResult<(usize, Vec<Post>)>;
    /// Retrieve a post by its identifier.
    fn get_post_by_id(&self, id: PostId) -> RepositoryResult<Option<Post>>;
    /// Retrieve a post by its slug.
    fn get_post_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Post>>;
}

/// Write operations for posts.
pub trait PostWriter {
    /// Persist a new post and return it enriched.
    fn create_post(&self, post: &NewPost) -> RepositoryResult<Post>;
    /// Apply a partial update and return the refreshed post.
    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepositoryResult<Post>;
    /// Delete a post, returning the number of rows removed.
    fn delete_post(&self, id: PostId) -> RepositoryResult<usize>;
}

/// Read-only operations for portfolio references.
pub trait ReferenceReader {
    /// List references matching the supplied query, newest first, along
    /// with the total match count before pagination.
    fn list_references(
        &self,
        query: ReferenceListQuery,
    ) -> RepositoryResult<(usize, Vec<Reference>)>;
    /// Retrieve a reference by its identifier.
    fn get_reference_by_id(&self, id: ReferenceId) -> RepositoryResult<Option<Reference>>;
    /// Retrieve a reference by its slug.
    fn get_reference_by_slug(&self, slug: &Slug) -> RepositoryResult<Option<Reference>>;
}

/// Write operations for portfolio references.
pub trait ReferenceWriter {
    /// Persist a new reference.
    fn create_reference(&self, reference: &NewReference) -> RepositoryResult<Reference>;
    /// Apply a partial update and return the refreshed reference.
    fn update_reference(
        &self,
        id: ReferenceId,
        update: &ReferenceUpdate,
    ) -> RepositoryResult<Reference>;
    /// Delete a reference, returning the number of rows removed.
    fn delete_reference(&self, id: ReferenceId) -> RepositoryResult<usize>;
}
