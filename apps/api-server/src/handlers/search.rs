//! Post search.

use actix_web::{HttpRequest, HttpResponse, web};
use quill_core::listing::{PageRequest, PostQuery};
use quill_core::ports::PostRepository;
use quill_shared::dto::SearchRequest;

use super::convert;
use super::params::QueryParams;
use crate::middleware::error::AppResult;
use crate::observability::RequestId;
use crate::state::AppState;

/// Build the listing query from raw parameters.
pub(crate) fn post_query(params: &SearchRequest, default_paginate_by: u64) -> PostQuery {
    PostQuery::new()
        .with_tags(&params.tags)
        .with_period(
            params.period_start_date.as_deref(),
            params.period_end_date.as_deref(),
        )
        .with_keyword(params.keyword.as_deref())
        .with_sort(params.sort.as_deref())
        .with_page(PageRequest::parse(
            params.page.as_deref(),
            params.paginate_by.as_deref(),
            default_paginate_by,
        ))
}

/// Filtered, sorted and paginated published posts.
///
/// GET /api/search?tags=..&tags=..&period_start_date=&period_end_date=&keyword=&sort=&paginate_by=&page=
pub async fn search(
    req: HttpRequest,
    request_id: RequestId,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let params = QueryParams::parse(req.query_string()).search_request();
    let query = post_query(&params, state.default_paginate_by);

    let page = state.posts.search(&query).await?;
    tracing::info!(
        request_id = %request_id.as_str(),
        count = page.count,
        page = page.number,
        num_pages = page.num_pages,
        "Search completed"
    );

    Ok(HttpResponse::Ok().json(convert::listing(page)))
}
