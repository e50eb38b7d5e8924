//! Tag lookup.

use actix_web::{HttpRequest, HttpResponse, web};
use quill_core::ports::TagRepository;
use quill_shared::dto::TagListResponse;

use super::convert;
use super::params::QueryParams;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Tags whose name contains `keyword`, ignoring case; every tag without one.
///
/// GET /api/search_tags?keyword=
pub async fn search_tags(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let params = QueryParams::parse(req.query_string()).tag_search();
    let keyword = params.keyword.as_deref().map(str::trim);

    let tags = state.tags.search(keyword).await?;

    Ok(HttpResponse::Ok().json(TagListResponse {
        tags: tags.into_iter().map(convert::tag).collect(),
    }))
}
