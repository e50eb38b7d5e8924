//! Data Transfer Objects - request/response types for the API.
//!
//! Listing parameters are kept as raw strings: malformed values are tolerated
//! and resolved to defaults by the listing engine instead of being rejected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query parameters of `GET /api/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Repeated `tags=` parameter.
    #[serde(default)]
    pub tags: Vec<String>,
    pub period_start_date: Option<String>,
    pub period_end_date: Option<String>,
    pub keyword: Option<String>,
    pub sort: Option<String>,
    pub paginate_by: Option<String>,
    pub page: Option<String>,
}

/// Pagination parameters of the plain listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub paginate_by: Option<String>,
}

/// Query parameters of `GET /api/search_tags`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagSearchRequest {
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagListResponse {
    pub tags: Vec<TagResponse>,
}

/// A user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub tags: Vec<TagResponse>,
    pub is_published: bool,
    pub date_publish: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Page links to render around the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationResponse {
    pub numbers: Vec<u64>,
    pub display_first: bool,
    pub display_last: bool,
}

/// A paginated listing together with its navigation links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse<T> {
    pub page: PageResponse<T>,
    pub navigation: NavigationResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserHomeResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub listing: ListingResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub author: UserResponse,
    pub other_posts: Vec<PostResponse>,
}

/// Landing page content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexResponse {
    pub posts: Vec<PostResponse>,
    pub tags: Vec<TagResponse>,
}
