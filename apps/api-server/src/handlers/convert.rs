//! Mapping from domain values to response bodies.

use quill_core::domain::{Post, Tag, User};
use quill_core::listing::Page;
use quill_shared::dto::{
    ListingResponse, NavigationResponse, PageResponse, PostResponse, TagResponse, UserResponse,
};

pub fn tag(tag: Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name,
    }
}

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        display_name: user.public_name().to_string(),
    }
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        user_id: post.user_id,
        title: post.title,
        slug: post.slug,
        body: post.body,
        tags: post.tags.into_iter().map(tag).collect(),
        is_published: post.is_published,
        date_publish: post.date_publish,
        created_at: post.created_at,
    }
}

/// A page of posts together with its navigation window.
pub fn listing(page: Page<Post>) -> ListingResponse<PostResponse> {
    let navigation = page.navigation();
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    let page = page.map(post);

    ListingResponse {
        page: PageResponse {
            items: page.items,
            number: page.number,
            num_pages: page.num_pages,
            count: page.count,
            has_next,
            has_previous,
        },
        navigation: NavigationResponse {
            numbers: navigation.numbers,
            display_first: navigation.display_first,
            display_last: navigation.display_last,
        },
    }
}
