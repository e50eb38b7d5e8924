//! In-memory repositories sharing one set of tables behind an async RwLock.
//!
//! Listings evaluate the core listing engine over the current rows, so the
//! results match the PostgreSQL repositories. Data is lost on process restart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, Tag, User};
use quill_core::error::RepoError;
use quill_core::listing::{
    Page, PageRequest, Paginator, PostFilter, PostQuery, SortOrder, sort_posts,
};
use quill_core::ports::{BaseRepository, PostRepository, TagRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    tags: HashMap<Uuid, Tag>,
}

impl Tables {
    fn published_by(&self, user_id: Uuid) -> impl Iterator<Item = &Post> {
        self.posts
            .values()
            .filter(move |post| post.is_published && post.user_id == user_id)
    }
}

/// Shared in-memory tables. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn tags(&self) -> InMemoryTagRepository {
        InMemoryTagRepository {
            tables: Arc::clone(&self.tables),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

pub struct InMemoryTagRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        let taken = tables
            .users
            .values()
            .any(|user| user.username == entity.username && user.id != entity.id);
        if taken {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                entity.username
            )));
        }

        tables.users.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        tables.users.remove(&id).ok_or(RepoError::NotFound)?;
        tables.posts.retain(|_, post| post.user_id != id);

        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;

        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&entity.user_id) {
            return Err(RepoError::Constraint(format!(
                "user {} does not exist",
                entity.user_id
            )));
        }
        if let Some(tag) = entity.tags.iter().find(|t| !tables.tags.contains_key(&t.id)) {
            return Err(RepoError::Constraint(format!(
                "tag {} does not exist",
                tag.id
            )));
        }
        let slug_taken = tables.posts.values().any(|post| {
            post.user_id == entity.user_id && post.slug == entity.slug && post.id != entity.id
        });
        if slug_taken {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already used by this user",
                entity.slug
            )));
        }

        let mut stored = entity;
        let mut seen = HashSet::new();
        stored.tags.retain(|tag| seen.insert(tag.id));

        tables.posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn search(&self, query: &PostQuery) -> Result<Page<Post>, RepoError> {
        tracing::debug!(
            tags = ?query.tags,
            period = ?query.period,
            keywords = ?query.keywords,
            sort = query.sort.as_str(),
            page = query.page.page,
            per_page = query.page.per_page,
            "Searching posts in memory"
        );

        let known = InMemoryTagRepository {
            tables: Arc::clone(&self.tables),
        }
        .find_by_names(&query.tags)
        .await?;

        let tables = self.tables.read().await;
        let hits = PostFilter::new(query, &known).apply(tables.posts.values());

        Ok(Paginator::paginate(hits, query.page.page, query.page.per_page))
    }

    async fn published_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.published_by(user_id).cloned().collect();
        sort_posts(&mut posts, SortOrder::default());

        Ok(Paginator::paginate(posts, page.page, page.per_page))
    }

    async fn latest_published(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|post| post.is_published)
            .cloned()
            .collect();
        sort_posts(&mut posts, SortOrder::default());
        posts.truncate(limit as usize);

        Ok(posts)
    }

    async fn find_published_by_slug(
        &self,
        user_id: Uuid,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;

        Ok(tables
            .published_by(user_id)
            .find(|post| post.slug == slug)
            .cloned())
    }

    async fn other_published(
        &self,
        user_id: Uuid,
        exclude: Uuid,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .published_by(user_id)
            .filter(|post| post.id != exclude)
            .cloned()
            .collect();
        sort_posts(&mut posts, SortOrder::default());
        posts.truncate(limit as usize);

        Ok(posts)
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn save(&self, entity: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;

        let taken = tables
            .tags
            .values()
            .any(|tag| tag.name == entity.name && tag.id != entity.id);
        if taken {
            return Err(RepoError::Constraint(format!(
                "tag '{}' already exists",
                entity.name
            )));
        }

        tables.tags.insert(entity.id, entity.clone());
        for post in tables.posts.values_mut() {
            for tag in post.tags.iter_mut().filter(|t| t.id == entity.id) {
                *tag = entity.clone();
            }
        }

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        tables.tags.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            post.tags.retain(|tag| tag.id != id);
        }

        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn search(&self, keyword: Option<&str>) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let needle = keyword.map(str::to_lowercase).unwrap_or_default();

        let mut tags: Vec<Tag> = tables
            .tags
            .values()
            .filter(|tag| tag.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(tags)
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;

        Ok(tables
            .tags
            .values()
            .filter(|tag| names.contains(&tag.name))
            .cloned()
            .collect())
    }

    async fn get_or_create(&self, name: &str) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;

        if let Some(tag) = tables.tags.values().find(|tag| tag.name == name) {
            return Ok(tag.clone());
        }

        tracing::debug!(tag = %name, "Creating tag");
        let tag = Tag::new(name);
        tables.tags.insert(tag.id, tag.clone());

        Ok(tag)
    }

    async fn random_in_use(&self, limit: u64) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;

        let in_use: HashSet<Uuid> = tables
            .posts
            .values()
            .filter(|post| post.is_published)
            .flat_map(|post| post.tags.iter().map(|tag| tag.id))
            .collect();
        let mut tags: Vec<Tag> = in_use
            .iter()
            .filter_map(|id| tables.tags.get(id).cloned())
            .collect();

        tags.shuffle(&mut rand::thread_rng());
        tags.truncate(limit as usize);

        Ok(tags)
    }
}
