//! Wiring of the content services over one store and one shared cache.

use std::sync::Arc;

use crate::application::categories::{CachedCategoryService, CategoryService};
use crate::application::comments::{CachedCommentService, CommentService};
use crate::application::posts::{CachedPostService, PostService};
use crate::application::repos::{CategoriesRepo, CommentsRepo, PostsRepo};
use crate::cache::Cache;

/// The three content services, sharing a cache and chained for
/// cross-entity checks (posts consult categories, comments consult posts).
#[derive(Clone)]
pub struct ContentServices {
    pub categories: Arc<dyn CategoryService>,
    pub posts: Arc<dyn PostService>,
    pub comments: Arc<dyn CommentService>,
}

impl ContentServices {
    pub fn new<R>(repos: Arc<R>, cache: Arc<dyn Cache>) -> Self
    where
        R: CategoriesRepo + PostsRepo + CommentsRepo + 'static,
    {
        let categories: Arc<dyn CategoryService> = Arc::new(CachedCategoryService::new(
            repos.clone(),
            cache.clone(),
        ));
        let posts: Arc<dyn PostService> = Arc::new(CachedPostService::new(
            repos.clone(),
            categories.clone(),
            cache.clone(),
        ));
        let comments: Arc<dyn CommentService> =
            Arc::new(CachedCommentService::new(repos, posts.clone(), cache));

        Self {
            categories,
            posts,
            comments,
        }
    }
}
