//! Cache configuration.
//!
//! Controls the in-process object cache via the `[cache]` section of
//! `quire.toml`.

use std::num::NonZeroUsize;

use super::keys::Region;

const DEFAULT_CATEGORY_LIMIT: usize = 500;
const DEFAULT_POST_LIMIT: usize = 500;
const DEFAULT_POST_LIST_LIMIT: usize = 50;
const DEFAULT_COMMENT_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Serve reads from the object cache. When off, every read goes to the store.
    pub enabled: bool,
    /// Maximum entries in the `category` region.
    pub category_limit: usize,
    /// Maximum entries in the `post` region.
    pub post_limit: usize,
    /// Maximum cached post pages and per-category lists.
    pub post_list_limit: usize,
    /// Maximum cached per-post comment lists.
    pub comment_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            category_limit: DEFAULT_CATEGORY_LIMIT,
            post_limit: DEFAULT_POST_LIMIT,
            post_list_limit: DEFAULT_POST_LIST_LIMIT,
            comment_limit: DEFAULT_COMMENT_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            category_limit: settings.category_limit,
            post_limit: settings.post_limit,
            post_list_limit: settings.post_list_limit,
            comment_limit: settings.comment_limit,
        }
    }
}

impl CacheConfig {
    /// Capacity of a region, clamping zero to one.
    pub fn limit_for(&self, region: Region) -> NonZeroUsize {
        let limit = match region {
            Region::Category => self.category_limit,
            Region::Post => self.post_limit,
            Region::PostList => self.post_list_limit,
            Region::Comment => self.comment_limit,
        };
        NonZeroUsize::new(limit).unwrap_or(NonZeroUsize::MIN)
    }
}
