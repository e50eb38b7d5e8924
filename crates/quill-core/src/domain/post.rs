use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Tag;

const SLUG_LENGTH: usize = 12;

/// Post entity - a blog article, either a draft or published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub tags: Vec<Tag>,
    pub is_published: bool,
    /// Civil date of the first publication. `None` while the post is a draft.
    pub date_publish: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft with a random slug.
    pub fn new(user_id: Uuid, title: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            slug: random_slug(),
            body: body.into(),
            tags: Vec::new(),
            is_published: false,
            date_publish: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Switch the post to published and record `today` as its publish date.
    ///
    /// Publishing an already published post is a no-op: the original date is kept.
    pub fn publish(&mut self, today: NaiveDate) {
        if self.is_published {
            return;
        }
        self.is_published = true;
        self.date_publish = Some(today);
        self.updated_at = Utc::now();
    }
}

fn random_slug() -> String {
    let mut slug = Uuid::new_v4().simple().to_string();
    slug.truncate(SLUG_LENGTH);
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    #[test]
    fn test_new_post_is_draft() {
        let post = Post::new(Uuid::new_v4(), "title", "body");

        assert!(!post.is_published);
        assert_eq!(post.date_publish, None);
        assert_eq!(post.slug.len(), SLUG_LENGTH);
    }

    #[test]
    fn test_publish_draft_records_date() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut post = Post::new(Uuid::new_v4(), "title", "body");

        post.publish(today);

        assert!(post.is_published);
        assert_eq!(post.date_publish, Some(today));
    }

    #[test]
    fn test_publish_twice_keeps_first_date() {
        let first = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut post = Post::new(Uuid::new_v4(), "title", "body");

        post.publish(first);
        post.publish(first + Days::new(5));

        assert_eq!(post.date_publish, Some(first));
    }
}
