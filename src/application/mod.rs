//! Application services layer.

pub mod archive;
pub mod categories;
pub mod comments;
pub mod error;
pub mod pagination;
pub mod posts;
pub mod repos;
pub mod services;
