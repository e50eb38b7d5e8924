//! Public profile pages.

use actix_web::{HttpRequest, HttpResponse, web};
use quill_core::DomainError;
use quill_core::domain::User;
use quill_core::listing::PageRequest;
use quill_core::ports::{PostRepository, UserRepository};
use quill_shared::dto::{PostDetailResponse, UserHomeResponse};

use super::convert;
use super::params::QueryParams;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const OTHER_POSTS: u64 = 5;

async fn active_user(state: &AppState, username: &str) -> AppResult<User> {
    match state.users.find_by_username(username).await? {
        Some(user) if user.is_active => Ok(user),
        _ => Err(DomainError::not_found("User", username).into()),
    }
}

/// A user's published posts, newest first.
///
/// GET /api/users/{username}/home?page=&paginate_by=
pub async fn home(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let user = active_user(&state, &path).await?;
    let params = QueryParams::parse(req.query_string()).page_params();
    let request = PageRequest::parse(
        params.page.as_deref(),
        params.paginate_by.as_deref(),
        state.default_paginate_by,
    );

    let page = state.posts.published_by_user(user.id, request).await?;

    Ok(HttpResponse::Ok().json(UserHomeResponse {
        user: convert::user(&user),
        listing: convert::listing(page),
    }))
}

/// One published post and more posts by the same author.
///
/// GET /api/users/{username}/posts/{slug}
pub async fn post_detail(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let (username, slug) = path.into_inner();
    let user = active_user(&state, &username).await?;

    let post = state
        .posts
        .find_published_by_slug(user.id, &slug)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", format!("{username}/{slug}")))?;
    let other_posts = state
        .posts
        .other_published(user.id, post.id, OTHER_POSTS)
        .await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: convert::post(post),
        author: convert::user(&user),
        other_posts: other_posts.into_iter().map(convert::post).collect(),
    }))
}
