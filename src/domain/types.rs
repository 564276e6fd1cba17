//! Shared domain enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of stored resource, used to identify what a failed lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Category,
    Post,
    Comment,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Category => "Category",
            ResourceKind::Post => "Post",
            ResourceKind::Comment => "Comment",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post attributes a paginated scan may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostSortField {
    Id,
    Title,
    Description,
    Content,
    CategoryId,
}

impl PostSortField {
    pub fn as_str(self) -> &'static str {
        match self {
            PostSortField::Id => "id",
            PostSortField::Title => "title",
            PostSortField::Description => "description",
            PostSortField::Content => "content",
            PostSortField::CategoryId => "categoryId",
        }
    }
}

impl TryFrom<&str> for PostSortField {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "id" => Ok(PostSortField::Id),
            "title" => Ok(PostSortField::Title),
            "description" => Ok(PostSortField::Description),
            "content" => Ok(PostSortField::Content),
            "categoryId" | "category_id" => Ok(PostSortField::CategoryId),
            _ => Err(()),
        }
    }
}
