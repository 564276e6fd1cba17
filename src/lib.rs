//! Quire: categories, posts and comments behind a coherent read-through cache.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
