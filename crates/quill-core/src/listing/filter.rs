//! In-memory evaluation of a [`PostQuery`].
//!
//! Used by storage backends that hold posts in memory: all predicates are
//! combined into one [`PostFilter`] and evaluated in a single pass.

use std::collections::HashSet;

use uuid::Uuid;

use super::{PostQuery, SortOrder};
use crate::domain::{Post, Tag};

/// Compiled predicate for one listing request.
#[derive(Debug)]
pub struct PostFilter<'q> {
    query: &'q PostQuery,
    /// `None` when the query names no tags. `Some` of an empty set when none of
    /// the named tags exist, which matches nothing.
    required_tags: Option<HashSet<Uuid>>,
    keywords: Vec<String>,
}

impl<'q> PostFilter<'q> {
    /// Compile `query`, resolving its tag names against `known_tags`.
    ///
    /// Names without a matching tag are dropped from the requirement.
    pub fn new(query: &'q PostQuery, known_tags: &[Tag]) -> Self {
        let required_tags = (!query.tags.is_empty()).then(|| {
            known_tags
                .iter()
                .filter(|tag| query.tags.iter().any(|name| *name == tag.name))
                .map(|tag| tag.id)
                .collect::<HashSet<_>>()
        });
        let keywords = query.keywords.iter().map(|k| k.to_lowercase()).collect();

        Self {
            query,
            required_tags,
            keywords,
        }
    }

    /// Whether a post belongs to the listing.
    pub fn matches(&self, post: &Post) -> bool {
        self.matches_tags(post)
            && self.query.period.contains(post.date_publish)
            && self.matches_keywords(post)
            && post.is_published
    }

    /// Filter and order `posts`.
    pub fn apply<'a, I>(&self, posts: I) -> Vec<Post>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut hits: Vec<Post> = posts
            .into_iter()
            .filter(|post| self.matches(post))
            .cloned()
            .collect();
        sort_posts(&mut hits, self.query.sort);
        hits
    }

    fn matches_tags(&self, post: &Post) -> bool {
        let Some(required) = &self.required_tags else {
            return true;
        };
        if required.is_empty() {
            return false;
        }
        let matched: HashSet<Uuid> = post
            .tags
            .iter()
            .map(|tag| tag.id)
            .filter(|id| required.contains(id))
            .collect();
        matched.len() == required.len()
    }

    fn matches_keywords(&self, post: &Post) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let title = post.title.to_lowercase();
        let body = post.body.to_lowercase();
        self.keywords
            .iter()
            .all(|keyword| title.contains(keyword.as_str()) || body.contains(keyword.as_str()))
    }
}

/// Order posts by publish date, newest creation first among equal dates.
pub fn sort_posts(posts: &mut [Post], order: SortOrder) {
    posts.sort_by(|a, b| {
        let by_date = match order {
            SortOrder::DatePublishDesc => b.date_publish.cmp(&a.date_publish),
            SortOrder::DatePublishAsc => a.date_publish.cmp(&b.date_publish),
        };
        by_date.then_with(|| b.created_at.cmp(&a.created_at))
    });
}
