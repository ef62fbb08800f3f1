use serde::Serialize;

use crate::content::markdown::{TocItem, build_nested_toc, extract_headings, preprocess_markdown};
use crate::content::related::{DEFAULT_RELATED_LIMIT, ScoredPost, find_related};
use crate::domain::post::Post;
use crate::domain::reference::Reference;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{PostListQuery, PostReader, ReferenceListQuery, ReferenceReader};

use super::{ServiceError, ServiceResult};

/// View model for the post detail page.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub post: Post,
    /// Body with escaped-link artifacts repaired, ready for the client-side
    /// markdown renderer.
    pub content: String,
    pub toc: Vec<TocItem>,
    pub related: Vec<ScoredPost>,
}

/// Core business logic for rendering the index page.
pub fn show_index<R>(page: usize, tag: Option<&str>, repo: &R) -> ServiceResult<Paginated<Post>>
where
    R: PostReader,
{
    let mut query = PostListQuery::default().paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(tag) = tag {
        query = query.tag(tag);
    }

    match repo.list_posts(query) {
        Ok((total, posts)) => Ok(Paginated::new(
            posts,
            page,
            total.div_ceil(DEFAULT_ITEMS_PER_PAGE),
        )),
        Err(e) => {
            log::error!("Failed to list posts for index: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Core business logic for rendering a post page: the enriched post, its
/// heading outline and the ranked related posts.
pub fn show_post<R>(slug: &str, repo: &R) -> ServiceResult<PostPage>
where
    R: PostReader,
{
    let post = super::posts::get_post_by_slug(slug, repo)?;

    let content = preprocess_markdown(&post.content);
    let toc = build_nested_toc(extract_headings(&content));

    let related = match repo.list_posts(PostListQuery::default()) {
        Ok((_total, pool)) => find_related(&post, &pool, DEFAULT_RELATED_LIMIT),
        Err(e) => {
            log::error!("Failed to list posts for related ranking: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(PostPage {
        post,
        content,
        toc,
        related,
    })
}

/// Core business logic for the references page.
pub fn show_references<R>(tag: Option<&str>, repo: &R) -> ServiceResult<Vec<Reference>>
where
    R: ReferenceReader,
{
    let mut query = ReferenceListQuery::default();
    if let Some(tag) = tag {
        query = query.tag(tag);
    }

    match repo.list_references(query) {
        Ok((_total, references)) => Ok(references),
        Err(e) => {
            log::error!("Failed to list references: {e}");
            Err(ServiceError::Internal)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::types::{AuthorName, PostTitle};
    use crate::forms::posts::CreatePostPayload;
    use crate::repository::test::TestRepository;
    use crate::services::posts::create_post;

    fn seeded_repo() -> TestRepository {
        let repo = TestRepository::default();
        for (title, content) in [
            ("First Post", "# Intro\n\nHello.\n\n## Details\n\nMore."),
            ("Second Post", "plain body"),
            ("Third Post", "plain body"),
        ] {
            create_post(
                CreatePostPayload {
                    title: PostTitle::new(title).unwrap(),
                    author: AuthorName::new("Ada").unwrap(),
                    description: None,
                    image_url: None,
                    image_alt: None,
                    pub_date: Some(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
                    tags: vec!["rust".to_string()],
                    content: content.to_string(),
                },
                &repo,
            )
            .unwrap();
        }
        repo
    }

    #[test]
    fn show_index_paginates() {
        let repo = seeded_repo();
        let page = show_index(1, None, &repo).unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn show_post_builds_toc_and_related() {
        let repo = seeded_repo();
        let page = show_post("first-post", &repo).unwrap();

        assert_eq!(page.toc.len(), 1);
        assert_eq!(page.toc[0].children[0].text, "Details");
        assert_eq!(page.related.len(), 2);
        assert!(page.related.iter().all(|s| s.post.slug != "first-post"));
    }

    #[test]
    fn show_post_unknown_slug_is_not_found() {
        let repo = seeded_repo();
        assert_eq!(
            show_post("missing", &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }
}
