//! Domain entities mirrored from the durable store.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub content: String,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub content: String,
    pub post_id: i64,
}

impl CommentRecord {
    /// Whether this comment is stored under the given post.
    pub fn belongs_to(&self, post_id: i64) -> bool {
        self.post_id == post_id
    }
}
