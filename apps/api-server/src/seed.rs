//! Demo content for running the server without a database.

use chrono::Days;
use quill_core::domain::{Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, TagRepository};

use crate::state::AppState;

const AUTHORS: [(&str, &str); 2] = [("alice", "Alice"), ("bob", "Bob")];

const POSTS: [(&str, &str, &[&str]); 6] = [
    ("Hello Quill", "A first post about nothing in particular.", &["meta"]),
    ("Async Rust in practice", "Futures, executors and pinning.", &["rust", "async"]),
    ("Indexing tags", "GROUP BY and HAVING for tag intersections.", &["databases"]),
    ("Actix handlers", "Extractors and responders in actix-web.", &["rust", "web"]),
    ("Paginating results", "Clamping page numbers and page windows.", &["web"]),
    ("Query planning", "Reading EXPLAIN output.", &["databases", "postgres"]),
];

/// Fill the store with a few authors, tags and published posts plus one draft.
pub async fn seed_demo(state: &AppState) -> Result<(), RepoError> {
    let mut authors = Vec::with_capacity(AUTHORS.len());
    for (username, display_name) in AUTHORS {
        let user = User::new(username).with_display_name(display_name);
        authors.push(state.users.save(user).await?);
    }

    let today = state.calendar.today();
    for (i, (title, body, tag_names)) in POSTS.iter().enumerate() {
        let mut tags = Vec::with_capacity(tag_names.len());
        for name in tag_names.iter() {
            tags.push(state.tags.get_or_create(name).await?);
        }

        let author = &authors[i % authors.len()];
        let mut post = Post::new(author.id, *title, *body).with_tags(tags);
        let published = today.checked_sub_days(Days::new(i as u64)).unwrap_or(today);
        post.publish(published);
        state.posts.save(post).await?;
    }

    let draft = Post::new(authors[0].id, "Unfinished thoughts", "Not ready yet.");
    state.posts.save(draft).await?;

    tracing::info!(
        users = AUTHORS.len(),
        posts = POSTS.len() + 1,
        "Demo content loaded"
    );

    Ok(())
}
