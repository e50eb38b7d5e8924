//! Query string parsing for the listing endpoints.
//!
//! Keys may repeat. Scalar parameters take their last value, `tags` keeps every
//! value, so a redundant parameter never discards the others.

use quill_shared::dto::{PageParams, SearchRequest, TagSearchRequest};

/// Decoded `key=value` pairs of a query string, in order.
#[derive(Debug, Default)]
pub(crate) struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub(crate) fn parse(query: &str) -> Self {
        let pairs = serde_html_form::from_str(query).unwrap_or_else(|e| {
            tracing::debug!(query = %query, error = %e, "Ignoring malformed query string");
            Vec::new()
        });
        Self(pairs)
    }

    /// Last value given for `key`.
    pub(crate) fn last(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Every value given for `key`, in order.
    pub(crate) fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub(crate) fn search_request(&self) -> SearchRequest {
        SearchRequest {
            tags: self.all("tags"),
            period_start_date: self.last("period_start_date"),
            period_end_date: self.last("period_end_date"),
            keyword: self.last("keyword"),
            sort: self.last("sort"),
            paginate_by: self.last("paginate_by"),
            page: self.last("page"),
        }
    }

    pub(crate) fn page_params(&self) -> PageParams {
        PageParams {
            page: self.last("page"),
            paginate_by: self.last("paginate_by"),
        }
    }

    pub(crate) fn tag_search(&self) -> TagSearchRequest {
        TagSearchRequest {
            keyword: self.last("keyword"),
        }
    }
}
