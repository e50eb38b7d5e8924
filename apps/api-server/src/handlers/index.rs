//! Landing page.

use actix_web::{HttpResponse, web};
use quill_core::ports::{PostRepository, TagRepository};
use quill_shared::dto::IndexResponse;

use super::convert;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const LATEST_POSTS: u64 = 5;
const RANDOM_TAGS: u64 = 10;

/// Newest published posts and a random selection of tags in use.
///
/// GET /api/index
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.latest_published(LATEST_POSTS).await?;
    let tags = state.tags.random_in_use(RANDOM_TAGS).await?;

    Ok(HttpResponse::Ok().json(IndexResponse {
        posts: posts.into_iter().map(convert::post).collect(),
        tags: tags.into_iter().map(convert::tag).collect(),
    }))
}
