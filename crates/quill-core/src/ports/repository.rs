use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, Tag, User};
use crate::error::RepoError;
use crate::listing::{Page, PageRequest, PostQuery};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository. Every listing method only returns published posts.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Filter, order and paginate published posts.
    async fn search(&self, query: &PostQuery) -> Result<Page<Post>, RepoError>;

    /// A user's published posts, newest first.
    async fn published_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// The most recently published posts across all users.
    async fn latest_published(&self, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// A published post identified by its author and slug.
    async fn find_published_by_slug(
        &self,
        user_id: Uuid,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Up to `limit` published posts by `user_id`, excluding `exclude`, newest first.
    async fn other_published(
        &self,
        user_id: Uuid,
        exclude: Uuid,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    /// Tags whose name contains `keyword` case-insensitively, oldest first.
    /// `None` or an empty keyword lists every tag.
    async fn search(&self, keyword: Option<&str>) -> Result<Vec<Tag>, RepoError>;

    /// Existing tags among `names`. Unknown names are skipped.
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Tag>, RepoError>;

    /// Fetch the tag called `name`, creating it when missing.
    async fn get_or_create(&self, name: &str) -> Result<Tag, RepoError>;

    /// Up to `limit` random tags carried by at least one published post.
    async fn random_in_use(&self, limit: u64) -> Result<Vec<Tag>, RepoError>;
}
