use chrono::NaiveDate;
use tinta_blog::content::meta::ContentType;
use tinta_blog::domain::post::{NewPost, PostUpdate};
use tinta_blog::domain::reference::NewReference;
use tinta_blog::domain::types::{
    AuthorName, PostTitle, ReferenceFormat, ReferenceTitle, Slug,
};
use tinta_blog::repository::{
    DieselRepository, PostListQuery, PostReader, PostWriter, ReferenceListQuery, ReferenceReader,
    ReferenceWriter,
};

mod common;

fn new_post(title: &str, slug: &str, tags: &[&str], pub_date: (i32, u32, u32)) -> NewPost {
    NewPost {
        title: PostTitle::new(title).expect("valid title"),
        author: AuthorName::new("Ada Lovelace").expect("valid author"),
        description: None,
        image_url: None,
        image_alt: None,
        pub_date: NaiveDate::from_ymd_opt(pub_date.0, pub_date.1, pub_date.2)
            .expect("valid date"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        content: "# Heading\n\nSome body text with a [link](https://example.com).".to_string(),
        slug: Slug::new(slug).expect("valid slug"),
    }
}

fn new_reference(title: &str, slug: &str, format: ReferenceFormat) -> NewReference {
    NewReference {
        title: ReferenceTitle::new(title).expect("valid title"),
        description: Some("A reference".to_string()),
        format,
        tags: vec!["tooling".to_string()],
        content: "Reference body".to_string(),
        slug: Slug::new(slug).expect("valid slug"),
    }
}

#[test]
fn created_posts_come_back_enriched() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_post(&new_post("First Post", "first-post", &["rust"], (2024, 1, 10)))
        .expect("should create post");

    assert_eq!(created.meta.reading_time, 1);
    assert_eq!(created.meta.content_type, ContentType::Note);
    assert_eq!(created.meta.word_count, 7);
    assert_eq!(created.meta.excerpt, "Heading Some body text with a link.");

    let fetched = repo
        .get_post_by_id(created.id)
        .expect("should fetch post")
        .expect("post should exist");
    assert_eq!(fetched.meta, created.meta);
    assert_eq!(fetched.tags, vec!["rust".to_string()]);
}

#[test]
fn slug_lookup_and_uniqueness() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_post(&new_post("First Post", "first-post", &[], (2024, 1, 10)))
        .expect("should create post");

    let found = repo
        .get_post_by_slug(&Slug::new("first-post").unwrap())
        .expect("should query by slug");
    assert!(found.is_some());

    let missing = repo
        .get_post_by_slug(&Slug::new("absent").unwrap())
        .expect("should query by slug");
    assert!(missing.is_none());

    // The slug column carries a UNIQUE constraint.
    let duplicate = repo.create_post(&new_post("Other Title", "first-post", &[], (2024, 1, 11)));
    assert!(duplicate.is_err());
}

#[test]
fn list_orders_newest_first_and_filters_by_tag() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_post(&new_post("Old", "old", &["rust"], (2023, 6, 1)))
        .expect("should create post");
    repo.create_post(&new_post("New", "new", &["rust", "web"], (2024, 1, 10)))
        .expect("should create post");
    repo.create_post(&new_post("Other", "other", &["cooking"], (2024, 1, 5)))
        .expect("should create post");

    let (total, posts) = repo
        .list_posts(PostListQuery::default())
        .expect("should list posts");
    assert_eq!(total, 3);
    let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["new", "other", "old"]);

    let (total, posts) = repo
        .list_posts(PostListQuery::default().tag("rust"))
        .expect("should list posts");
    assert_eq!(total, 2);
    assert!(posts.iter().all(|p| p.tags.iter().any(|t| t == "rust")));

    // "web" must not match a post tagged "webassembly".
    repo.create_post(&new_post("Wasm", "wasm", &["webassembly"], (2024, 2, 1)))
        .expect("should create post");
    let (total, _) = repo
        .list_posts(PostListQuery::default().tag("web"))
        .expect("should list posts");
    assert_eq!(total, 1);
}

#[test]
fn list_paginates_and_reports_totals() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    for day in 1..=5 {
        repo.create_post(&new_post(
            &format!("Post {day}"),
            &format!("post-{day}"),
            &[],
            (2024, 1, day),
        ))
        .expect("should create post");
    }

    let (total, posts) = repo
        .list_posts(PostListQuery::default().paginate(2, 2))
        .expect("should list posts");
    assert_eq!(total, 5);
    assert_eq!(posts.len(), 2);
    // Page 2 of a newest-first ordering over days 5..1.
    assert_eq!(posts[0].slug.as_str(), "post-3");
    assert_eq!(posts[1].slug.as_str(), "post-2");
}

#[test]
fn search_matches_title_and_body() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.create_post(&new_post("Diesel Tricks", "diesel-tricks", &[], (2024, 1, 10)))
        .expect("should create post");
    repo.create_post(&new_post("Unrelated", "unrelated", &[], (2024, 1, 11)))
        .expect("should create post");

    let (total, posts) = repo
        .list_posts(PostListQuery::default().search("Diesel"))
        .expect("should search posts");
    assert_eq!(total, 1);
    assert_eq!(posts[0].slug.as_str(), "diesel-tricks");
}

#[test]
fn update_keeps_slug_and_reenriches() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_post(&new_post("First Post", "first-post", &[], (2024, 1, 10)))
        .expect("should create post");

    let update = PostUpdate {
        title: Some(PostTitle::new("Renamed").unwrap()),
        content: Some("x".repeat(3_500)),
        ..PostUpdate::default()
    };
    let updated = repo
        .update_post(created.id, &update)
        .expect("should update post");

    assert_eq!(updated.slug.as_str(), "first-post");
    assert_eq!(updated.title.as_str(), "Renamed");
    assert_eq!(updated.meta.reading_time, 3);
    assert_eq!(updated.meta.content_type, ContentType::Post);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn delete_removes_the_row() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_post(&new_post("Doomed", "doomed", &[], (2024, 1, 10)))
        .expect("should create post");

    assert_eq!(repo.delete_post(created.id).expect("should delete"), 1);
    assert_eq!(repo.delete_post(created.id).expect("should delete"), 0);
    assert!(
        repo.get_post_by_id(created.id)
            .expect("should query")
            .is_none()
    );
}

#[test]
fn reference_crud_round_trip() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let created = repo
        .create_reference(&new_reference("Cheat Sheet", "cheat-sheet", ReferenceFormat::Markdown))
        .expect("should create reference");
    assert_eq!(created.format, ReferenceFormat::Markdown);

    repo.create_reference(&new_reference("Raw Notes", "raw-notes", ReferenceFormat::Plaintext))
        .expect("should create reference");

    let (total, references) = repo
        .list_references(ReferenceListQuery::default().format(ReferenceFormat::Plaintext))
        .expect("should list references");
    assert_eq!(total, 1);
    assert_eq!(references[0].slug.as_str(), "raw-notes");

    let update = tinta_blog::domain::reference::ReferenceUpdate {
        format: Some(ReferenceFormat::Html),
        ..Default::default()
    };
    let updated = repo
        .update_reference(created.id, &update)
        .expect("should update reference");
    assert_eq!(updated.format, ReferenceFormat::Html);
    assert_eq!(updated.slug.as_str(), "cheat-sheet");

    assert_eq!(
        repo.delete_reference(created.id).expect("should delete"),
        1
    );
    assert!(
        repo.get_reference_by_id(created.id)
            .expect("should query")
            .is_none()
    );
}
