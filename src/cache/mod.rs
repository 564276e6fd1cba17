//! Quire Cache System
//!
//! A process-wide object cache consulted before the durable store. Entries
//! never expire; services keep it coherent by evicting every key a mutation
//! could have made stale before the mutation returns. A value loaded from
//! the store on a miss is cached only if its region saw no invalidation
//! while it was being loaded.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! post_limit = 500
//! post_list_limit = 50
//! # ... see config.rs for all options
//! ```

mod config;
mod keys;
mod lock;
mod store;

pub use config::CacheConfig;
pub use keys::{CacheKey, CachedValue, PageQuery, Region};
pub use store::{Cache, Epoch, L0Store, NoopCache, build_cache};
