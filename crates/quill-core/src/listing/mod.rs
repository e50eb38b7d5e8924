//! Listing engine shared by the search page and the user home.
//!
//! A request's query parameters are parsed once into an immutable [`PostQuery`].
//! Storage backends turn that value into a single composed query (SQL, or one
//! predicate over an in-memory snapshot), slice it with a [`Paginator`] and hand
//! the resulting [`Page`] to [`Navigation::around`] for the page links.

mod calendar;
mod filter;
mod navigation;
mod paginator;
mod query;

pub use calendar::LocalCalendar;
pub use filter::{PostFilter, sort_posts};
pub use navigation::Navigation;
pub use paginator::{Page, Paginator};
pub use query::{
    DATE_FORMAT, DEFAULT_PAGINATE_BY, DateRange, PageRequest, PostQuery, SortOrder,
    split_keywords,
};
