//! Repository traits describing the durable store.
//!
//! Identity is the store's responsibility: a save without an id inserts and
//! assigns one, a save with an id overwrites that record.

use thiserror::Error;

use crate::application::pagination::{PageRequest, PageResult};
use crate::domain::entities::{CategoryRecord, CommentRecord, PostRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SaveCategoryParams {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct SavePostParams {
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
    pub content: String,
    pub category_id: i64,
}

#[derive(Debug, Clone)]
pub struct SaveCommentParams {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub content: String,
    pub post_id: i64,
}

pub trait CategoriesRepo: Send + Sync {
    fn find_by_id(&self, id: i64) -> Result<Option<CategoryRecord>, RepoError>;

    fn find_all(&self) -> Result<Vec<CategoryRecord>, RepoError>;

    fn save(&self, params: SaveCategoryParams) -> Result<CategoryRecord, RepoError>;

    fn delete(&self, category: &CategoryRecord) -> Result<(), RepoError>;
}

pub trait PostsRepo: Send + Sync {
    fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;

    /// Sorted scan of all posts, sliced to the requested page.
    fn find_page(&self, request: &PageRequest) -> Result<PageResult<PostRecord>, RepoError>;

    fn find_by_category(&self, category_id: i64) -> Result<Vec<PostRecord>, RepoError>;

    fn save(&self, params: SavePostParams) -> Result<PostRecord, RepoError>;

    fn delete(&self, post: &PostRecord) -> Result<(), RepoError>;
}

pub trait CommentsRepo: Send + Sync {
    fn find_by_id(&self, id: i64) -> Result<Option<CommentRecord>, RepoError>;

    fn find_by_post(&self, post_id: i64) -> Result<Vec<CommentRecord>, RepoError>;

    fn save(&self, params: SaveCommentParams) -> Result<CommentRecord, RepoError>;

    fn delete(&self, comment: &CommentRecord) -> Result<(), RepoError>;
}
