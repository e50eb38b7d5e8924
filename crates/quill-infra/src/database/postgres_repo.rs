//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, LoaderTrait, ModelTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Post, Tag, User};
use quill_core::error::RepoError;
use quill_core::listing::{Page, PageRequest, Paginator, PostQuery, SortOrder};
use quill_core::ports::{BaseRepository, PostRepository, TagRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::listing;
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn search(&self, keyword: Option<&str>) -> Result<Vec<Tag>, RepoError> {
        let mut select = TagEntity::find();
        if let Some(keyword) = keyword.filter(|k| !k.is_empty()) {
            select = select.filter(listing::contains_ignore_case(tag::Column::Name, keyword));
        }

        let tags = select
            .order_by_asc(tag::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(tags.into_iter().map(Into::into).collect())
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Tag>, RepoError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let tags = TagEntity::find()
            .filter(tag::Column::Name.is_in(names.iter().cloned()))
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(tags.into_iter().map(Into::into).collect())
    }

    async fn get_or_create(&self, name: &str) -> Result<Tag, RepoError> {
        let existing = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        match existing {
            Some(model) => Ok(model.into()),
            None => {
                tracing::debug!(tag = %name, "Creating tag");
                <Self as BaseRepository<Tag, Uuid>>::save(self, Tag::new(name)).await
            }
        }
    }

    async fn random_in_use(&self, limit: u64) -> Result<Vec<Tag>, RepoError> {
        let in_use = Query::select()
            .distinct()
            .column((PostTagEntity, post_tag::Column::TagId))
            .from(PostTagEntity)
            .inner_join(
                PostEntity,
                Expr::col((PostEntity, post::Column::Id))
                    .equals((PostTagEntity, post_tag::Column::PostId)),
            )
            .and_where(Expr::col((PostEntity, post::Column::IsPublished)).eq(true))
            .to_owned();

        let tags = TagEntity::find()
            .filter(tag::Column::Id.in_subquery(in_use))
            .order_by(Expr::cust("RANDOM()"), Order::Asc)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(tags.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository. Posts are stored together with their tag links.
pub struct PostgresPostRepository {
    pub(crate) db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Run `select` and attach each post's tags in one batched load.
    async fn load(&self, select: Select<PostEntity>) -> Result<Vec<Post>, RepoError> {
        let models = select.all(&self.db).await.map_err(repo_error)?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let tags = models
            .load_many_to_many(TagEntity, PostTagEntity, &self.db)
            .await
            .map_err(repo_error)?;

        Ok(models
            .into_iter()
            .zip(tags)
            .map(|(model, tags)| model.into_domain(tags))
            .collect())
    }

    /// Count `select`, resolve the requested page and fetch only that slice.
    async fn paginate(
        &self,
        select: Select<PostEntity>,
        request: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let count = select.clone().count(&self.db).await.map_err(repo_error)?;
        let paginator = Paginator::new(count, request.per_page);
        let number = paginator.resolve(request.page);
        let (offset, limit) = paginator.bounds(number);
        tracing::debug!(
            count = paginator.count(),
            per_page = paginator.per_page(),
            page = number,
            num_pages = paginator.num_pages(),
            "Resolved page"
        );

        let items = if limit == 0 {
            Vec::new()
        } else {
            self.load(select.offset(offset).limit(limit)).await?
        };

        Ok(paginator.page(number, items))
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_error)?
        else {
            return Ok(None);
        };

        let tags = model
            .find_related(TagEntity)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(Some(model.into_domain(tags)))
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(repo_error)?;

        PostEntity::insert(post::ActiveModel::from(&entity))
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::Title,
                        post::Column::Slug,
                        post::Column::Body,
                        post::Column::IsPublished,
                        post::Column::DatePublish,
                        post::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(repo_error)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(entity.id))
            .exec(&txn)
            .await
            .map_err(repo_error)?;

        if !entity.tags.is_empty() {
            let links = entity.tags.iter().map(|tag| post_tag::ActiveModel {
                post_id: sea_orm::Set(entity.id),
                tag_id: sea_orm::Set(tag.id),
            });
            PostTagEntity::insert_many(links)
                .exec_without_returning(&txn)
                .await
                .map_err(repo_error)?;
        }

        txn.commit().await.map_err(repo_error)?;
        tracing::debug!(post_id = %entity.id, tags = entity.tags.len(), "Post saved");

        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(repo_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn search(&self, query: &PostQuery) -> Result<Page<Post>, RepoError> {
        tracing::debug!(
            tags = ?query.tags,
            period = ?query.period,
            keywords = ?query.keywords,
            sort = query.sort.as_str(),
            page = query.page.page,
            per_page = query.page.per_page,
            "Searching posts"
        );

        let mut select = PostEntity::find();

        if !query.tags.is_empty() {
            let tag_ids: Vec<Uuid> = PostgresTagRepository::new(self.db.clone())
                .find_by_names(&query.tags)
                .await?
                .into_iter()
                .map(|tag| tag.id)
                .collect();

            if tag_ids.is_empty() {
                return Ok(Page::empty());
            }
            select = listing::with_all_tags(select, &tag_ids);
        }

        let select = listing::within_period(select, &query.period);
        let select = listing::matching_keywords(select, &query.keywords);
        let select = listing::ordered(select, query.sort);
        let select = select.filter(post::Column::IsPublished.eq(true));

        self.paginate(select, query.page).await
    }

    async fn published_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let select = listing::published().filter(post::Column::UserId.eq(user_id));
        let select = listing::ordered(select, SortOrder::default());

        self.paginate(select, page).await
    }

    async fn latest_published(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let select = listing::ordered(listing::published(), SortOrder::default()).limit(limit);

        self.load(select).await
    }

    async fn find_published_by_slug(
        &self,
        user_id: Uuid,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let Some(model) = listing::published()
            .filter(post::Column::UserId.eq(user_id))
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_error)?
        else {
            return Ok(None);
        };

        let tags = model
            .find_related(TagEntity)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(Some(model.into_domain(tags)))
    }

    async fn other_published(
        &self,
        user_id: Uuid,
        exclude: Uuid,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let select = listing::published()
            .filter(post::Column::UserId.eq(user_id))
            .filter(post::Column::Id.ne(exclude));
        let select = listing::ordered(select, SortOrder::default()).limit(limit);

        self.load(select).await
    }
}
