//! Composition of listing queries over the `posts` table.
//!
//! Each helper adds predicates to a lazy `Select`; nothing touches the database
//! until the repository counts and slices the final statement.

use sea_orm::sea_query::{Expr, Func, LikeExpr, Query, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Select};
use uuid::Uuid;

use quill_core::listing::{DateRange, SortOrder};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};

/// All published posts.
pub(crate) fn published() -> Select<PostEntity> {
    PostEntity::find().filter(post::Column::IsPublished.eq(true))
}

/// Keep posts carrying every tag in `tag_ids`.
///
/// Posts linked to any of the tags are grouped and kept when the number of
/// distinct matching tags equals the number requested. `tag_ids` must be
/// distinct and non-empty.
pub(crate) fn with_all_tags(select: Select<PostEntity>, tag_ids: &[Uuid]) -> Select<PostEntity> {
    let required = tag_ids.len() as i64;
    let tagged = Query::select()
        .column(post_tag::Column::PostId)
        .from(PostTagEntity)
        .and_where(post_tag::Column::TagId.is_in(tag_ids.iter().copied()))
        .group_by_col(post_tag::Column::PostId)
        .and_having(
            Expr::col(post_tag::Column::TagId)
                .count_distinct()
                .eq(required),
        )
        .to_owned();

    select.filter(post::Column::Id.in_subquery(tagged))
}

/// Keep posts published inside `period`, both bounds inclusive.
pub(crate) fn within_period(mut select: Select<PostEntity>, period: &DateRange) -> Select<PostEntity> {
    if let Some(start) = period.start {
        select = select.filter(post::Column::DatePublish.gte(start));
    }
    if let Some(limit) = period.end_exclusive() {
        select = select.filter(post::Column::DatePublish.lt(limit));
    }
    select
}

/// Keep posts whose title or body contains every keyword, ignoring case.
pub(crate) fn matching_keywords(
    mut select: Select<PostEntity>,
    keywords: &[String],
) -> Select<PostEntity> {
    for keyword in keywords {
        select = select.filter(
            Condition::any()
                .add(contains_ignore_case(post::Column::Title, keyword))
                .add(contains_ignore_case(post::Column::Body, keyword)),
        );
    }
    select
}

/// Apply the listing order.
pub(crate) fn ordered(select: Select<PostEntity>, order: SortOrder) -> Select<PostEntity> {
    let select = match order {
        SortOrder::DatePublishDesc => select.order_by_desc(post::Column::DatePublish),
        SortOrder::DatePublishAsc => select.order_by_asc(post::Column::DatePublish),
    };
    select.order_by_desc(post::Column::CreatedAt)
}

/// `LOWER(column) LIKE '%keyword%'` with LIKE wildcards in `keyword` matched literally.
pub(crate) fn contains_ignore_case<C: ColumnTrait>(column: C, keyword: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&keyword.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
