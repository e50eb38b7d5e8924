use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::NaiveDate;
use serde_json::Value;

use quill_core::domain::{Post, Tag, User};
use quill_core::ports::{BaseRepository, TagRepository};
use quill_infra::InMemoryStore;

use super::configure_routes;
use crate::config::AppConfig;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

struct Fixture {
    state: AppState,
    alice: User,
    posts: Vec<Post>,
    draft: Post,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn tags(state: &AppState, names: &[&str]) -> Vec<Tag> {
    let mut tags = Vec::new();
    for name in names {
        tags.push(state.tags.get_or_create(name).await.unwrap());
    }
    tags
}

async fn published(
    state: &AppState,
    user: &User,
    slug: &str,
    title: &str,
    body: &str,
    tag_names: &[&str],
    on: NaiveDate,
) -> Post {
    let mut post = Post::new(user.id, title, body)
        .with_slug(slug)
        .with_tags(tags(state, tag_names).await);
    post.publish(on);
    state.posts.save(post).await.unwrap()
}

/// Four published posts by alice, in publish order, and one draft.
async fn fixture() -> Fixture {
    let state = AppState::in_memory(InMemoryStore::new(), &AppConfig::default());
    let alice = state
        .users
        .save(User::new("alice").with_display_name("Alice"))
        .await
        .unwrap();

    let posts = vec![
        published(&state, &alice, "async", "Rust async", "the tokio runtime", &["rust", "async"], date(2024, 1, 10)).await,
        published(&state, &alice, "web", "Rust web", "actix handlers", &["rust", "web"], date(2024, 1, 20)).await,
        published(&state, &alice, "design", "Web design", "css grid", &["web"], date(2024, 1, 31)).await,
        published(&state, &alice, "pg", "Postgres tips", "indexes for Rust apps", &["databases"], date(2024, 2, 1)).await,
    ];

    let draft = Post::new(alice.id, "Rust draft", "unfinished")
        .with_slug("draft")
        .with_tags(tags(&state, &["rust", "web", "orphan"]).await);
    let draft = state.posts.save(draft).await.unwrap();

    Fixture {
        state,
        alice,
        posts,
        draft,
    }
}

/// `count` posts by bob published on consecutive days.
async fn paged_fixture(count: u32) -> AppState {
    let state = AppState::in_memory(InMemoryStore::new(), &AppConfig::default());
    let bob = state.users.save(User::new("bob")).await.unwrap();
    for i in 0..count {
        let on = date(2024, 1, 1) + chrono::Days::new(u64::from(i));
        published(&state, &bob, &format!("p{i}"), &format!("Post {i}"), "body", &[], on).await;
    }
    state
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

fn titles(body: &Value) -> Vec<String> {
    body["page"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect()
}

#[actix_web::test]
async fn test_health() {
    let f = fixture().await;
    let (status, body) = get(&f.state, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_search_defaults_to_newest_first() {
    let f = fixture().await;
    let (status, body) = get(&f.state, "/api/search").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&body),
        ["Postgres tips", "Web design", "Rust web", "Rust async"]
    );
    assert_eq!(body["page"]["number"], 1);
    assert_eq!(body["page"]["num_pages"], 1);
    assert_eq!(body["page"]["count"], 4);
    assert_eq!(body["navigation"]["numbers"], serde_json::json!([1]));
}

#[actix_web::test]
async fn test_search_requires_all_tags() {
    let f = fixture().await;

    let (_, body) = get(&f.state, "/api/search?tags=rust&tags=web").await;
    assert_eq!(titles(&body), ["Rust web"]);

    let (_, body) = get(&f.state, "/api/search?tags=web&tags=rust&tags=web").await;
    assert_eq!(titles(&body), ["Rust web"]);

    let (_, body) = get(&f.state, "/api/search?tags=rust").await;
    assert_eq!(titles(&body), ["Rust web", "Rust async"]);
}

#[actix_web::test]
async fn test_repeated_parameter_keeps_tag_filter() {
    let f = fixture().await;

    let (status, body) = get(&f.state, "/api/search?tags=rust&keyword=css&keyword=rust").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["Rust web", "Rust async"]);

    let (_, body) = get(
        &f.state,
        "/api/search?tags=rust&sort=date_publish_desc&sort=date_publish_asc&page=9&page=1",
    )
    .await;
    assert_eq!(titles(&body), ["Rust async", "Rust web"]);
    assert_eq!(body["page"]["number"], 1);
}

#[actix_web::test]
async fn test_search_drops_unknown_tags() {
    let f = fixture().await;

    let (_, body) = get(&f.state, "/api/search?tags=rust&tags=cobol").await;
    assert_eq!(titles(&body), ["Rust web", "Rust async"]);

    let (status, body) = get(&f.state, "/api/search?tags=cobol&page=3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(titles(&body).is_empty());
    assert_eq!(body["page"]["number"], 1);
    assert_eq!(body["page"]["count"], 0);
}

#[actix_web::test]
async fn test_search_tag_only_on_draft_matches_nothing() {
    let f = fixture().await;

    let (_, body) = get(&f.state, "/api/search?tags=orphan").await;
    assert!(titles(&body).is_empty());
}

#[actix_web::test]
async fn test_search_date_bounds_are_inclusive() {
    let f = fixture().await;

    let (_, body) = get(
        &f.state,
        "/api/search?period_start_date=2024-01-20&period_end_date=2024-01-31",
    )
    .await;
    assert_eq!(titles(&body), ["Web design", "Rust web"]);
}

#[actix_web::test]
async fn test_search_ignores_malformed_dates() {
    let f = fixture().await;

    let (status, body) = get(
        &f.state,
        "/api/search?period_start_date=not-a-date&period_end_date=2024-01-10",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["Rust async"]);

    let (_, body) = get(&f.state, "/api/search?period_start_date=2024/01/20").await;
    assert_eq!(body["page"]["count"], 4);
}

#[actix_web::test]
async fn test_search_inverted_period_is_empty() {
    let f = fixture().await;

    let (status, body) = get(
        &f.state,
        "/api/search?period_start_date=2024-02-01&period_end_date=2024-01-01",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(titles(&body).is_empty());
}

#[actix_web::test]
async fn test_search_keywords_are_and_combined() {
    let f = fixture().await;

    let (_, body) = get(&f.state, "/api/search?keyword=rust+tokio").await;
    assert_eq!(titles(&body), ["Rust async"]);

    let (_, body) = get(&f.state, "/api/search?keyword=RUST").await;
    assert_eq!(titles(&body), ["Postgres tips", "Rust web", "Rust async"]);

    let (_, body) = get(&f.state, "/api/search?keyword=rust+css").await;
    assert!(titles(&body).is_empty());

    let (_, body) = get(&f.state, "/api/search?keyword=+++").await;
    assert_eq!(body["page"]["count"], 4);
}

#[actix_web::test]
async fn test_search_ascending_reverses_default_order() {
    let f = fixture().await;

    let (_, desc) = get(&f.state, "/api/search").await;
    let (_, asc) = get(&f.state, "/api/search?sort=date_publish_asc").await;
    let (_, unknown) = get(&f.state, "/api/search?sort=title").await;

    let mut reversed = titles(&desc);
    reversed.reverse();
    assert_eq!(titles(&asc), reversed);
    assert_eq!(titles(&unknown), titles(&desc));
}

#[actix_web::test]
async fn test_search_never_returns_drafts() {
    let f = fixture().await;

    let (_, body) = get(&f.state, "/api/search?keyword=draft").await;
    assert!(titles(&body).is_empty());

    let (_, body) = get(&f.state, "/api/search?paginate_by=100").await;
    let slugs: Vec<_> = body["page"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect();
    assert!(!slugs.contains(&f.draft.slug));
}

#[actix_web::test]
async fn test_search_is_idempotent() {
    let f = fixture().await;
    let uri = "/api/search?tags=rust&keyword=rust&sort=date_publish_asc&paginate_by=1&page=2";

    let (_, first) = get(&f.state, uri).await;
    let (_, second) = get(&f.state, uri).await;
    assert_eq!(first, second);
}

#[actix_web::test]
async fn test_out_of_range_pages_clamp_to_last() {
    let state = paged_fixture(21).await;

    for page in ["4", "0", "-1", "99", "99999999999999999999"] {
        let (status, body) = get(&state, &format!("/api/search?paginate_by=10&page={page}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"]["number"], 3, "page={page}");
        assert_eq!(body["page"]["num_pages"], 3);
        assert_eq!(body["page"]["count"], 21);
        assert_eq!(titles(&body), ["Post 0"]);
    }

    let (_, body) = get(&state, "/api/search?paginate_by=10&page=abc").await;
    assert_eq!(body["page"]["number"], 1);
    assert_eq!(body["page"]["has_next"], true);
    assert_eq!(body["page"]["has_previous"], false);
}

#[actix_web::test]
async fn test_invalid_page_size_falls_back_to_default() {
    let state = paged_fixture(21).await;

    for size in ["0", "-5", "ten"] {
        let (_, body) = get(&state, &format!("/api/search?paginate_by={size}")).await;
        assert_eq!(body["page"]["num_pages"], 3, "paginate_by={size}");
        assert_eq!(body["page"]["items"].as_array().unwrap().len(), 10);
    }
}

#[actix_web::test]
async fn test_navigation_window() {
    let state = paged_fixture(10).await;

    // 10 pages of one post each.
    let (_, body) = get(&state, "/api/search?paginate_by=1&page=5").await;
    assert_eq!(body["navigation"]["numbers"], serde_json::json!([4, 5, 6]));
    assert_eq!(body["navigation"]["display_first"], true);
    assert_eq!(body["navigation"]["display_last"], true);

    let (_, body) = get(&state, "/api/search?paginate_by=1&page=1").await;
    assert_eq!(body["navigation"]["numbers"], serde_json::json!([1, 2, 3, 4]));
    assert_eq!(body["navigation"]["display_first"], false);
    assert_eq!(body["navigation"]["display_last"], true);

    // 4 pages: everything, no shortcuts.
    let (_, body) = get(&state, "/api/search?paginate_by=3&page=2").await;
    assert_eq!(body["navigation"]["numbers"], serde_json::json!([1, 2, 3, 4]));
    assert_eq!(body["navigation"]["display_first"], false);
    assert_eq!(body["navigation"]["display_last"], false);
}

#[actix_web::test]
async fn test_search_tags() {
    let f = fixture().await;

    let (status, body) = get(&f.state, "/api/search_tags?keyword=WE").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tags"].as_array().unwrap().len(), 1);
    assert_eq!(body["tags"][0]["name"], "web");

    let (_, body) = get(&f.state, "/api/search_tags").await;
    let names: Vec<_> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["rust", "async", "web", "databases", "orphan"]);

    let (_, body) = get(&f.state, "/api/search_tags?keyword=").await;
    assert_eq!(body["tags"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn test_index() {
    let f = fixture().await;

    let (status, body) = get(&f.state, "/api/index").await;
    assert_eq!(status, StatusCode::OK);

    let posts: Vec<_> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(posts, ["Postgres tips", "Web design", "Rust web", "Rust async"]);

    let mut tags: Vec<_> = body["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    tags.sort_unstable();
    assert_eq!(tags, ["async", "databases", "rust", "web"]);
}

#[actix_web::test]
async fn test_index_limits_latest_posts() {
    let state = paged_fixture(8).await;

    let (_, body) = get(&state, "/api/index").await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 5);
    assert_eq!(posts[0]["title"], "Post 7");
}

#[actix_web::test]
async fn test_user_home_lists_published_posts() {
    let f = fixture().await;

    let (status, body) = get(&f.state, "/api/users/alice/home?paginate_by=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["display_name"], "Alice");
    assert_eq!(body["page"]["count"], 4);
    assert_eq!(body["page"]["num_pages"], 2);
    assert_eq!(titles(&body), ["Postgres tips", "Web design", "Rust web"]);
    assert_eq!(body["navigation"]["numbers"], serde_json::json!([1, 2]));

    let (_, body) = get(&f.state, "/api/users/alice/home?paginate_by=3&page=7").await;
    assert_eq!(body["page"]["number"], 2);
    assert_eq!(titles(&body), ["Rust async"]);
}

#[actix_web::test]
async fn test_user_home_unknown_user_is_not_found() {
    let f = fixture().await;

    let (status, body) = get(&f.state, "/api/users/mallory/home").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["title"], "Not Found");
}

#[actix_web::test]
async fn test_inactive_user_is_not_found() {
    let f = fixture().await;
    let mut alice = f.alice.clone();
    alice.is_active = false;
    f.state.users.save(alice).await.unwrap();

    let (status, _) = get(&f.state, "/api/users/alice/home").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_post_detail_with_other_posts() {
    let f = fixture().await;
    let post = &f.posts[1];

    let (status, body) = get(&f.state, &format!("/api/users/alice/posts/{}", post.slug)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["title"], "Rust web");
    assert_eq!(body["post"]["date_publish"], "2024-01-20");
    assert_eq!(body["author"]["username"], "alice");

    let others: Vec<_> = body["other_posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(others, ["Postgres tips", "Web design", "Rust async"]);
}

#[actix_web::test]
async fn test_post_detail_hides_drafts() {
    let f = fixture().await;

    let (status, _) = get(&f.state, &format!("/api/users/alice/posts/{}", f.draft.slug)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&f.state, "/api/users/alice/posts/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&f.state, "/api/users/nobody/posts/web").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let f = fixture().await;
    let app = test::init_service(
        App::new()
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(f.state.clone()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("X-Request-ID", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[actix_web::test]
async fn test_demo_content_is_searchable() {
    let state = AppState::in_memory(InMemoryStore::new(), &AppConfig::default());
    crate::seed::seed_demo(&state).await.unwrap();

    let (_, body) = get(&state, "/api/search?tags=rust").await;
    assert_eq!(body["page"]["count"], 2);

    let (_, body) = get(&state, "/api/search").await;
    assert_eq!(body["page"]["count"], 6);
}
