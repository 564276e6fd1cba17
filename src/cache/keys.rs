//! Cache regions, keys and cached value shapes.

use std::fmt;

use serde::Serialize;

use crate::application::pagination::PageResult;
use crate::domain::entities::{CategoryRecord, CommentRecord, PostRecord};

/// Namespace isolating the keys of one entity kind or query shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    /// Categories by id plus the full category list.
    Category,
    /// Posts by id.
    Post,
    /// Post pages and per-category post lists; not addressable by post id.
    PostList,
    /// Comment lists keyed by their owning post.
    Comment,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Category,
        Region::Post,
        Region::PostList,
        Region::Comment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Category => "category",
            Region::Post => "post",
            Region::PostList => "post_list",
            Region::Comment => "comment",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of a post listing exactly as the caller supplied them.
///
/// The direction stays a raw string so `"DESC"` and `"banana"` are cached
/// separately even though both resolve to descending order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageQuery {
    pub page_no: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_direction: String,
}

/// Key within a region.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// A single entity by its id.
    Id(i64),
    /// The whole collection of a region's entity kind.
    All,
    /// One page of a sorted listing.
    Page(PageQuery),
    /// Children of a category.
    Category(i64),
    /// Children of a post.
    Post(i64),
}

/// Value stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Category(CategoryRecord),
    Categories(Vec<CategoryRecord>),
    Post(PostRecord),
    PostPage(PageResult<PostRecord>),
    Posts(Vec<PostRecord>),
    Comments(Vec<CommentRecord>),
}

impl CachedValue {
    pub fn into_category(self) -> Option<CategoryRecord> {
        match self {
            CachedValue::Category(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_categories(self) -> Option<Vec<CategoryRecord>> {
        match self {
            CachedValue::Categories(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_post(self) -> Option<PostRecord> {
        match self {
            CachedValue::Post(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_post_page(self) -> Option<PageResult<PostRecord>> {
        match self {
            CachedValue::PostPage(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_posts(self) -> Option<Vec<PostRecord>> {
        match self {
            CachedValue::Posts(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_comments(self) -> Option<Vec<CommentRecord>> {
        match self {
            CachedValue::Comments(value) => Some(value),
            _ => None,
        }
    }
}
