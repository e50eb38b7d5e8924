//! Parsing of listing parameters.
//!
//! Every parser here is total: malformed input degrades to "filter not applied"
//! or to the documented default, never to an error.

use chrono::{Days, NaiveDate};

/// Page size used when the request does not carry a usable `paginate_by`.
pub const DEFAULT_PAGINATE_BY: u64 = 10;

/// Canonical format of `period_start_date` / `period_end_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Ordering of a post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest publish date first; ties broken by newest creation.
    #[default]
    DatePublishDesc,
    /// Oldest publish date first; ties still broken by newest creation.
    DatePublishAsc,
}

impl SortOrder {
    /// Parse a sort key, falling back to the default for absent or unknown keys.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("date_publish_asc") => Self::DatePublishAsc,
            Some("date_publish_desc") | None => Self::DatePublishDesc,
            Some(other) => {
                tracing::debug!(sort = %other, "Unknown sort key, using default order");
                Self::DatePublishDesc
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DatePublishDesc => "date_publish_desc",
            Self::DatePublishAsc => "date_publish_asc",
        }
    }
}

/// Inclusive publish-date window. Either bound may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Parse both bounds independently. A malformed bound is treated as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            start: start.and_then(|s| parse_date("period_start_date", s)),
            end: end.and_then(|s| parse_date("period_end_date", s)),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Exclusive upper bound: the day after `end`.
    pub fn end_exclusive(&self) -> Option<NaiveDate> {
        self.end.and_then(|end| end.checked_add_days(Days::new(1)))
    }

    /// Whether a publish date falls inside the window.
    ///
    /// An undated post only matches an unbounded window.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return self.is_unbounded();
        };
        if self.start.is_some_and(|start| date < start) {
            return false;
        }
        match (self.end, self.end_exclusive()) {
            (Some(_), Some(limit)) => date < limit,
            // `end` is the last representable date: nothing can lie past it.
            (Some(_), None) => true,
            (None, _) => true,
        }
    }
}

fn parse_date(param: &str, value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(param, value, error = %e, "Ignoring malformed date bound");
            None
        }
    }
}

/// Split a keyword query on whitespace (full-width spaces included).
pub fn split_keywords(keyword: &str) -> Vec<String> {
    keyword.split_whitespace().map(str::to_string).collect()
}

/// Requested page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Raw requested page; may be out of range, the paginator clamps it.
    pub page: i64,
    pub per_page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGINATE_BY,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, per_page: u64) -> Self {
        Self {
            page,
            per_page: per_page.max(1),
        }
    }

    /// Parse `page` and `paginate_by`.
    ///
    /// A non-numeric page means page 1; a number too large for `i64` saturates so
    /// it still clamps to the last page. A non-numeric or non-positive page size
    /// means `default_per_page`.
    pub fn parse(page: Option<&str>, paginate_by: Option<&str>, default_per_page: u64) -> Self {
        let page = page.and_then(parse_page_number).unwrap_or(1);
        let per_page = paginate_by
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(default_per_page);
        Self::new(page, per_page)
    }
}

fn parse_page_number(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    let (digits, saturated) = match value.strip_prefix('-') {
        Some(rest) => (rest, i64::MIN),
        None => (value.strip_prefix('+').unwrap_or(value), i64::MAX),
    };
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(saturated)
}

/// Immutable description of one post listing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostQuery {
    /// Tag names a post must all carry. Empty means no tag filtering.
    pub tags: Vec<String>,
    pub period: DateRange,
    /// Keywords that must each appear in the title or the body.
    pub keywords: Vec<String>,
    pub sort: SortOrder,
    pub page: PageRequest,
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require every given tag. Blank names are skipped and duplicates collapsed.
    pub fn with_tags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !self.tags.iter().any(|t| t == name) {
                self.tags.push(name.to_string());
            }
        }
        self
    }

    pub fn with_period(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.period = DateRange::parse(start, end);
        self
    }

    pub fn with_keyword(mut self, keyword: Option<&str>) -> Self {
        self.keywords = keyword.map(split_keywords).unwrap_or_default();
        self
    }

    pub fn with_sort(mut self, sort: Option<&str>) -> Self {
        self.sort = SortOrder::parse(sort);
        self
    }

    pub fn with_page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}
