//! Post lifecycle, paginated listing and per-category listing.
//!
//! Per-id posts live in the `post` region. Pages and per-category lists live
//! in `post_list`; they embed post fields but cannot be found by post id, so
//! every post mutation drops that whole region.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::categories::CategoryService;
use crate::application::error::ServiceError;
use crate::application::pagination::{PageRequest, PageResult, SortDirection};
use crate::application::repos::{PostsRepo, SavePostParams};
use crate::cache::{Cache, CacheKey, CachedValue, PageQuery, Region};
use crate::domain::entities::PostRecord;
use crate::domain::types::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCommand {
    pub title: String,
    pub description: String,
    pub content: String,
    pub category_id: i64,
}

pub trait PostService: Send + Sync {
    fn create(&self, command: PostCommand) -> Result<PostRecord, ServiceError>;

    /// One page of posts. `sort_direction` matching `asc` in any case sorts
    /// ascending; any other value sorts descending.
    fn list(
        &self,
        page_no: u32,
        page_size: u32,
        sort_field: &str,
        sort_direction: &str,
    ) -> Result<PageResult<PostRecord>, ServiceError>;

    fn get_by_id(&self, id: i64) -> Result<PostRecord, ServiceError>;

    fn update(&self, id: i64, command: PostCommand) -> Result<PostRecord, ServiceError>;

    fn delete_by_id(&self, id: i64) -> Result<(), ServiceError>;

    /// Posts of an existing category; empty when it has none.
    fn list_by_category(&self, category_id: i64) -> Result<Vec<PostRecord>, ServiceError>;
}

#[derive(Clone)]
pub struct CachedPostService {
    repo: Arc<dyn PostsRepo>,
    categories: Arc<dyn CategoryService>,
    cache: Arc<dyn Cache>,
}

impl CachedPostService {
    pub fn new(
        repo: Arc<dyn PostsRepo>,
        categories: Arc<dyn CategoryService>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            repo,
            categories,
            cache,
        }
    }

    fn load(&self, id: i64) -> Result<PostRecord, ServiceError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(ResourceKind::Post, id))
    }

    fn invalidate_lists(&self) {
        self.cache.evict_all(Region::PostList);
    }

    fn invalidate(&self, id: i64) {
        self.cache.evict(Region::Post, &CacheKey::Id(id));
        self.invalidate_lists();
    }
}

impl PostService for CachedPostService {
    fn create(&self, command: PostCommand) -> Result<PostRecord, ServiceError> {
        info!(
            target = "application::posts::create",
            category_id = command.category_id,
            "creating new post"
        );
        let category = self.categories.get(command.category_id)?;
        let PostCommand {
            title,
            description,
            content,
            ..
        } = command;

        let post = self.repo.save(SavePostParams {
            id: None,
            title,
            description,
            content,
            category_id: category.id,
        })?;
        self.invalidate_lists();
        Ok(post)
    }

    fn list(
        &self,
        page_no: u32,
        page_size: u32,
        sort_field: &str,
        sort_direction: &str,
    ) -> Result<PageResult<PostRecord>, ServiceError> {
        let request = PageRequest::new(
            page_no,
            page_size,
            sort_field,
            SortDirection::parse_lenient(sort_direction),
        )?;
        let key = CacheKey::Page(PageQuery {
            page_no,
            page_size,
            sort_field: sort_field.to_string(),
            sort_direction: sort_direction.to_string(),
        });

        if let Some(page) = self
            .cache
            .get(Region::PostList, &key)
            .and_then(CachedValue::into_post_page)
        {
            debug!(page_no, page_size, sort_field, "post page cache hit");
            return Ok(page);
        }

        info!(
            target = "application::posts::list",
            page_no,
            page_size,
            sort_field,
            direction = request.direction().as_str(),
            "sorting posts"
        );
        let epoch = self.cache.epoch(Region::PostList);
        let page = self.repo.find_page(&request)?;
        self.cache.fill(
            Region::PostList,
            key,
            CachedValue::PostPage(page.clone()),
            epoch,
        );
        Ok(page)
    }

    fn get_by_id(&self, id: i64) -> Result<PostRecord, ServiceError> {
        let key = CacheKey::Id(id);
        if let Some(post) = self
            .cache
            .get(Region::Post, &key)
            .and_then(CachedValue::into_post)
        {
            debug!(post_id = id, "post cache hit");
            return Ok(post);
        }

        info!(
            target = "application::posts::get_by_id",
            post_id = id,
            "get post by id"
        );
        let epoch = self.cache.epoch(Region::Post);
        let post = self.load(id)?;
        self.cache
            .fill(Region::Post, key, CachedValue::Post(post.clone()), epoch);
        Ok(post)
    }

    fn update(&self, id: i64, command: PostCommand) -> Result<PostRecord, ServiceError> {
        info!(
            target = "application::posts::update",
            post_id = id,
            "updating post by id"
        );
        let existing = self.load(id)?;
        let category = self.categories.get(command.category_id)?;
        let PostCommand {
            title,
            description,
            content,
            ..
        } = command;

        let post = self
            .repo
            .save(SavePostParams {
                id: Some(existing.id),
                title,
                description,
                content,
                category_id: category.id,
            })
            .map_err(|err| ServiceError::from_repo(err, ResourceKind::Post, id))?;
        self.invalidate(id);
        Ok(post)
    }

    fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        info!(
            target = "application::posts::delete_by_id",
            post_id = id,
            "deleting post by id"
        );
        let existing = self.load(id)?;
        self.repo
            .delete(&existing)
            .map_err(|err| ServiceError::from_repo(err, ResourceKind::Post, id))?;
        self.invalidate(id);
        Ok(())
    }

    fn list_by_category(&self, category_id: i64) -> Result<Vec<PostRecord>, ServiceError> {
        info!(
            target = "application::posts::list_by_category",
            category_id,
            "get category by id"
        );
        let category = self.categories.get(category_id)?;

        let key = CacheKey::Category(category.id);
        if let Some(posts) = self
            .cache
            .get(Region::PostList, &key)
            .and_then(CachedValue::into_posts)
        {
            debug!(category_id, count = posts.len(), "category post list cache hit");
            return Ok(posts);
        }

        info!(
            target = "application::posts::list_by_category",
            category_id,
            "get list of posts by category id"
        );
        let epoch = self.cache.epoch(Region::PostList);
        let posts = self.repo.find_by_category(category.id)?;
        self.cache
            .fill(Region::PostList, key, CachedValue::Posts(posts.clone()), epoch);
        Ok(posts)
    }
}
