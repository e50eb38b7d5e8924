//! Fixed-size pagination with page-number clamping.

use serde::Serialize;

use super::Navigation;

/// Splits `count` ordered items into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(count: u64, per_page: u64) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Total number of pages. An empty collection still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        self.count.div_ceil(self.per_page).max(1)
    }

    /// Resolve a requested page number to a valid one.
    ///
    /// Numbers past the end, as well as numbers below 1, resolve to the last page.
    pub fn resolve(&self, requested: i64) -> u64 {
        let last = self.num_pages();
        match u64::try_from(requested) {
            Ok(n) if (1..=last).contains(&n) => n,
            _ => last,
        }
    }

    /// `(offset, limit)` of a resolved page within the collection.
    pub fn bounds(&self, number: u64) -> (u64, u64) {
        let offset = number.saturating_sub(1).saturating_mul(self.per_page);
        let limit = self.per_page.min(self.count.saturating_sub(offset));
        (offset, limit)
    }

    /// Wrap the items of an already resolved page.
    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            num_pages: self.num_pages(),
            count: self.count,
        }
    }

    /// Slice a fully materialized collection.
    pub fn paginate<T>(items: Vec<T>, requested: i64, per_page: u64) -> Page<T> {
        let paginator = Self::new(items.len() as u64, per_page);
        let number = paginator.resolve(requested);
        let (offset, limit) = paginator.bounds(number);
        let items = items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        paginator.page(number, items)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Resolved (clamped) page number, 1-based.
    pub number: u64,
    pub num_pages: u64,
    /// Number of items across all pages.
    pub count: u64,
}

impl<T> Page<T> {
    /// The single page of an empty listing.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            number: 1,
            num_pages: 1,
            count: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn navigation(&self) -> Navigation {
        Navigation::around(self.number, self.num_pages)
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
        }
    }
}
