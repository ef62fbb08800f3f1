use chrono::Utc;

use crate::content::related::{DEFAULT_RELATED_LIMIT, ScoredPost, find_related};
use crate::content::text::slugify;
use crate::domain::post::{NewPost, Post, PostUpdate};
use crate::domain::types::{PostId, Slug};
use crate::forms::posts::CreatePostPayload;
use crate::repository::{PostListQuery, PostReader, PostWriter};

use super::{ServiceError, ServiceResult};

/// List posts for the API, optionally filtered by tag or search string.
///
/// Repository errors are converted into `ServiceError` variants so that the
/// HTTP route can remain a thin wrapper.
pub fn list_posts<R>(tag: Option<&str>, search: Option<&str>, repo: &R) -> ServiceResult<Vec<Post>>
where
    R: PostReader,
{
    let mut query = PostListQuery::default();
    if let Some(tag) = tag {
        query = query.tag(tag);
    }
    if let Some(search) = search {
        query = query.search(search);
    }

    match repo.list_posts(query) {
        Ok((_total, posts)) => Ok(posts),
        Err(e) => {
            log::error!("Failed to list posts: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a single post by its numeric identifier.
pub fn get_post<R>(id: i32, repo: &R) -> ServiceResult<Post>
where
    R: PostReader,
{
    let id = match PostId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_post_by_id(id) {
        Ok(Some(post)) => Ok(post),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Fetch a single post by its slug.
pub fn get_post_by_slug<R>(slug: &str, repo: &R) -> ServiceResult<Post>
where
    R: PostReader,
{
    let slug = match Slug::new(slug) {
        Ok(slug) => slug,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_post_by_slug(&slug) {
        Ok(Some(post)) => Ok(post),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post by slug: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Create a post, deriving its slug from the title.
///
/// The slug is derived exactly once here; it never changes afterwards.
/// Returns `Conflict` when another post already owns the slug.
pub fn create_post<R>(payload: CreatePostPayload, repo: &R) -> ServiceResult<Post>
where
    R: PostReader + PostWriter,
{
    let slug = match Slug::new(slugify(payload.title.as_str())) {
        Ok(slug) => slug,
        Err(_) => {
            return Err(ServiceError::Form(
                "title does not produce a usable slug".to_string(),
            ));
        }
    };

    match repo.get_post_by_slug(&slug) {
        Ok(Some(_)) => {
            return Err(ServiceError::Conflict(
                "a post with this title already exists".to_string(),
            ));
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to check slug uniqueness: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let new_post = NewPost {
        title: payload.title,
        author: payload.author,
        description: payload.description,
        image_url: payload.image_url,
        image_alt: payload.image_alt,
        pub_date: payload.pub_date.unwrap_or_else(|| Utc::now().date_naive()),
        tags: payload.tags,
        content: payload.content,
        slug,
    };

    match repo.create_post(&new_post) {
        Ok(post) => Ok(post),
        Err(e) => {
            log::error!("Failed to create post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Apply a partial update to an existing post.
pub fn update_post<R>(id: i32, update: PostUpdate, repo: &R) -> ServiceResult<Post>
where
    R: PostReader + PostWriter,
{
    let id = match PostId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_post_by_id(id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get post: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.update_post(id, &update) {
        Ok(post) => Ok(post),
        Err(e) => {
            log::error!("Failed to update post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Delete a post by id.
pub fn delete_post<R>(id: i32, repo: &R) -> ServiceResult<()>
where
    R: PostReader + PostWriter,
{
    let id = match PostId::new(id) {
        Ok(id) => id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.delete_post(id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Failed to delete post: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Rank every other post against the given one and return the best matches.
///
/// The whole post set is the candidate pool; bodies are expected to stay in
/// the tens-to-hundreds range, so no pagination is applied here.
pub fn related_posts<R>(id: i32, limit: Option<usize>, repo: &R) -> ServiceResult<Vec<ScoredPost>>
where
    R: PostReader,
{
    let pivot = get_post(id, repo)?;

    let pool = match repo.list_posts(PostListQuery::default()) {
        Ok((_total, posts)) => posts,
        Err(e) => {
            log::error!("Failed to list candidate posts: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(find_related(
        &pivot,
        &pool,
        limit.unwrap_or(DEFAULT_RELATED_LIMIT),
    ))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::types::{AuthorName, PostTitle};
    use crate::repository::test::TestRepository;

    fn payload(title: &str, tags: &[&str], content: &str, pub_date: &str) -> CreatePostPayload {
        CreatePostPayload {
            title: PostTitle::new(title).unwrap(),
            author: AuthorName::new("Ada").unwrap(),
            description: None,
            image_url: None,
            image_alt: None,
            pub_date: Some(NaiveDate::parse_from_str(pub_date, "%Y-%m-%d").unwrap()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            content: content.to_string(),
        }
    }

    #[test]
    fn create_post_derives_slug_and_enriches() {
        let repo = TestRepository::default();
        let post = create_post(
            payload("Hello, World!", &["rust"], "Short body.", "2024-01-10"),
            &repo,
        )
        .unwrap();

        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.meta.word_count, 2);
        assert_eq!(post.meta.reading_time, 1);
    }

    #[test]
    fn create_post_rejects_duplicate_slug() {
        let repo = TestRepository::default();
        create_post(payload("Same Title", &[], "a", "2024-01-10"), &repo).unwrap();

        let err = create_post(payload("Same   Title", &[], "b", "2024-01-11"), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn create_post_rejects_unsluggable_title() {
        let repo = TestRepository::default();
        let err = create_post(payload("???", &[], "body", "2024-01-10"), &repo).unwrap_err();
        assert!(matches!(err, ServiceError::Form(_)));
    }

    #[test]
    fn get_post_maps_missing_ids_to_not_found() {
        let repo = TestRepository::default();
        assert_eq!(get_post(7, &repo).unwrap_err(), ServiceError::NotFound);
        assert_eq!(get_post(-1, &repo).unwrap_err(), ServiceError::NotFound);
    }

    #[test]
    fn update_post_keeps_slug_stable() {
        let repo = TestRepository::default();
        let post = create_post(
            payload("Original Title", &[], "body", "2024-01-10"),
            &repo,
        )
        .unwrap();

        let update = PostUpdate {
            title: Some(PostTitle::new("Renamed Completely").unwrap()),
            ..PostUpdate::default()
        };
        let updated = update_post(post.id.get(), update, &repo).unwrap();

        assert_eq!(updated.title, "Renamed Completely");
        assert_eq!(updated.slug, "original-title");
    }

    #[test]
    fn delete_post_then_get_is_not_found() {
        let repo = TestRepository::default();
        let post = create_post(payload("Bye", &[], "body", "2024-01-10"), &repo).unwrap();

        delete_post(post.id.get(), &repo).unwrap();
        assert_eq!(
            get_post(post.id.get(), &repo).unwrap_err(),
            ServiceError::NotFound
        );
        assert_eq!(
            delete_post(post.id.get(), &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn list_posts_filters_by_tag() {
        let repo = TestRepository::default();
        create_post(payload("One", &["rust"], "a", "2024-01-10"), &repo).unwrap();
        create_post(payload("Two", &["cooking"], "b", "2024-01-11"), &repo).unwrap();

        let posts = list_posts(Some("rust"), None, &repo).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "One");
    }

    #[test]
    fn related_posts_excludes_pivot_and_respects_limit() {
        let repo = TestRepository::default();
        let pivot = create_post(payload("Pivot", &["rust"], "a", "2024-01-10"), &repo).unwrap();
        for i in 0..5 {
            create_post(
                payload(&format!("Other {i}"), &["rust"], "a", "2024-01-12"),
                &repo,
            )
            .unwrap();
        }

        let related = related_posts(pivot.id.get(), Some(2), &repo).unwrap();
        assert_eq!(related.len(), 2);
        assert!(related.iter().all(|scored| scored.post.id != pivot.id));
    }

    #[test]
    fn related_posts_for_missing_pivot_is_not_found() {
        let repo = TestRepository::default();
        assert_eq!(
            related_posts(1, None, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }
}
