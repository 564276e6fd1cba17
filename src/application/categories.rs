//! Category lifecycle with read-through caching.

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::error::ServiceError;
use crate::application::repos::{CategoriesRepo, SaveCategoryParams};
use crate::cache::{Cache, CacheKey, CachedValue, Region};
use crate::domain::entities::CategoryRecord;
use crate::domain::types::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCommand {
    pub name: String,
    pub description: String,
}

pub trait CategoryService: Send + Sync {
    fn add(&self, command: CategoryCommand) -> Result<CategoryRecord, ServiceError>;

    fn get(&self, id: i64) -> Result<CategoryRecord, ServiceError>;

    fn list(&self) -> Result<Vec<CategoryRecord>, ServiceError>;

    fn update(&self, id: i64, command: CategoryCommand) -> Result<CategoryRecord, ServiceError>;

    fn delete(&self, id: i64) -> Result<(), ServiceError>;
}

/// Category service caching single categories by id and the full list
/// under [`CacheKey::All`], both in the `category` region.
#[derive(Clone)]
pub struct CachedCategoryService {
    repo: Arc<dyn CategoriesRepo>,
    cache: Arc<dyn Cache>,
}

impl CachedCategoryService {
    pub fn new(repo: Arc<dyn CategoriesRepo>, cache: Arc<dyn Cache>) -> Self {
        Self { repo, cache }
    }

    fn load(&self, id: i64) -> Result<CategoryRecord, ServiceError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::not_found(ResourceKind::Category, id))
    }

    fn invalidate(&self, id: i64) {
        self.cache.evict(Region::Category, &CacheKey::Id(id));
        self.cache.evict(Region::Category, &CacheKey::All);
    }
}

impl CategoryService for CachedCategoryService {
    fn add(&self, command: CategoryCommand) -> Result<CategoryRecord, ServiceError> {
        info!(
            target = "application::categories::add",
            name = command.name.as_str(),
            "creating new category"
        );
        let CategoryCommand { name, description } = command;
        let category = self.repo.save(SaveCategoryParams {
            id: None,
            name,
            description,
        })?;
        self.cache.evict(Region::Category, &CacheKey::All);
        Ok(category)
    }

    fn get(&self, id: i64) -> Result<CategoryRecord, ServiceError> {
        let key = CacheKey::Id(id);
        if let Some(category) = self
            .cache
            .get(Region::Category, &key)
            .and_then(CachedValue::into_category)
        {
            debug!(category_id = id, "category cache hit");
            return Ok(category);
        }

        info!(
            target = "application::categories::get",
            category_id = id,
            "fetching category by id"
        );
        let epoch = self.cache.epoch(Region::Category);
        let category = self.load(id)?;
        self.cache.fill(
            Region::Category,
            key,
            CachedValue::Category(category.clone()),
            epoch,
        );
        Ok(category)
    }

    fn list(&self) -> Result<Vec<CategoryRecord>, ServiceError> {
        if let Some(categories) = self
            .cache
            .get(Region::Category, &CacheKey::All)
            .and_then(CachedValue::into_categories)
        {
            debug!(count = categories.len(), "category list cache hit");
            return Ok(categories);
        }

        info!(
            target = "application::categories::list",
            "fetching list of categories"
        );
        let epoch = self.cache.epoch(Region::Category);
        let categories = self.repo.find_all()?;
        self.cache.fill(
            Region::Category,
            CacheKey::All,
            CachedValue::Categories(categories.clone()),
            epoch,
        );
        Ok(categories)
    }

    fn update(&self, id: i64, command: CategoryCommand) -> Result<CategoryRecord, ServiceError> {
        info!(
            target = "application::categories::update",
            category_id = id,
            "updating category by id"
        );
        let existing = self.load(id)?;
        let CategoryCommand { name, description } = command;

        let category = self
            .repo
            .save(SaveCategoryParams {
                id: Some(existing.id),
                name,
                description,
            })
            .map_err(|err| ServiceError::from_repo(err, ResourceKind::Category, id))?;
        self.invalidate(id);
        Ok(category)
    }

    fn delete(&self, id: i64) -> Result<(), ServiceError> {
        info!(
            target = "application::categories::delete",
            category_id = id,
            "deleting category by id"
        );
        let existing = self.load(id)?;
        self.repo
            .delete(&existing)
            .map_err(|err| ServiceError::from_repo(err, ResourceKind::Category, id))?;
        self.invalidate(id);
        Ok(())
    }
}
