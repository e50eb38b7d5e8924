use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::error::RepoError;
use quill_core::listing::{PageRequest, PostQuery};
use quill_core::ports::{BaseRepository, PostRepository, TagRepository, UserRepository};

use super::entity::{post, tag, user};
use super::postgres_repo::{PostgresPostRepository, PostgresTagRepository, PostgresUserRepository};

fn post_model(id: Uuid, user_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        user_id,
        title: "Test Post".to_owned(),
        slug: "test-post".to_owned(),
        body: "Content".to_owned(),
        is_published: true,
        date_publish: NaiveDate::from_ymd_opt(2024, 6, 1),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn tag_model(name: &str) -> tag::Model {
    tag::Model {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        created_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id_loads_tags() {
    let post_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, user_id)]])
        .append_query_results([vec![tag_model("rust"), tag_model("web")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.date_publish, NaiveDate::from_ymd_opt(2024, 6, 1));
    let names: Vec<_> = post.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["rust", "web"]);
}

#[tokio::test]
async fn test_find_missing_post_skips_tag_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());

    assert_eq!(repo.db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_find_user_by_username() {
    let now = Utc::now();
    let id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user::Model {
            id,
            username: "alice".to_owned(),
            display_name: None,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let found = repo.find_by_username("alice").await.unwrap().unwrap();

    assert_eq!(found.id, id);
    assert_eq!(found.public_name(), "alice");
}

#[tokio::test]
async fn test_search_with_only_unknown_tags_is_empty() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<tag::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let query = PostQuery::new()
        .with_tags(["nope"])
        .with_page(PageRequest::new(4, 10));
    let page = repo.search(&query).await.unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.number, 1);
    assert_eq!(page.num_pages, 1);
    assert_eq!(page.count, 0);

    // Only the tag lookup ran.
    assert_eq!(repo.db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = repo.delete(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_tag_search_matches_lowercased_name() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tag_model("Rust")]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);
    let tags = repo.search(Some("RUST")).await.unwrap();
    assert_eq!(tags.len(), 1);

    let log = format!("{:?}", repo.db.into_transaction_log());
    assert!(log.contains("LOWER("), "{log}");
    assert!(log.contains("%rust%"), "{log}");
}

#[tokio::test]
async fn test_tag_search_without_keyword_has_no_filter() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tag_model("a"), tag_model("b")]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);
    assert_eq!(repo.search(Some("")).await.unwrap().len(), 2);

    let log = format!("{:?}", repo.db.into_transaction_log());
    assert!(!log.contains("LIKE"), "{log}");
}
