//! Comments addressed through their owning post.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::error::ServiceError;
use crate::application::posts::PostService;
use crate::application::repos::{CommentsRepo, SaveCommentParams};
use crate::cache::{Cache, CacheKey, CachedValue, Region};
use crate::domain::entities::CommentRecord;
use crate::domain::types::ResourceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentCommand {
    pub name: String,
    pub email: String,
    pub content: String,
}

pub trait CommentService: Send + Sync {
    fn create(&self, post_id: i64, command: CommentCommand)
    -> Result<CommentRecord, ServiceError>;

    /// Comments stored under `post_id`. The post itself is not looked up, so
    /// an unknown post yields an empty list.
    fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentRecord>, ServiceError>;

    fn get_by_id(&self, post_id: i64, comment_id: i64) -> Result<CommentRecord, ServiceError>;

    fn update(
        &self,
        post_id: i64,
        comment_id: i64,
        command: CommentCommand,
    ) -> Result<CommentRecord, ServiceError>;

    fn delete(&self, post_id: i64, comment_id: i64) -> Result<(), ServiceError>;
}

/// Comment service caching each post's comment list in the `comment` region.
#[derive(Clone)]
pub struct CachedCommentService {
    repo: Arc<dyn CommentsRepo>,
    posts: Arc<dyn PostService>,
    cache: Arc<dyn Cache>,
}

impl CachedCommentService {
    pub fn new(
        repo: Arc<dyn CommentsRepo>,
        posts: Arc<dyn PostService>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self { repo, posts, cache }
    }

    /// Resolve a comment through its post: the post must exist, the comment
    /// must exist, and the comment must be stored under that post.
    fn resolve(&self, post_id: i64, comment_id: i64) -> Result<CommentRecord, ServiceError> {
        let post = self.posts.get_by_id(post_id)?;

        let comment = self
            .repo
            .find_by_id(comment_id)?
            .ok_or_else(|| ServiceError::not_found(ResourceKind::Comment, comment_id))?;

        if !comment.belongs_to(post.id) {
            warn!(
                target = "application::comments::resolve",
                comment_id,
                post_id,
                owner_post_id = comment.post_id,
                "comment does not belong to post"
            );
            return Err(ServiceError::ownership_mismatch());
        }

        Ok(comment)
    }

    fn invalidate(&self, post_id: i64) {
        self.cache.evict(Region::Comment, &CacheKey::Post(post_id));
    }
}

impl CommentService for CachedCommentService {
    fn create(
        &self,
        post_id: i64,
        command: CommentCommand,
    ) -> Result<CommentRecord, ServiceError> {
        info!(
            target = "application::comments::create",
            post_id,
            "creating new comment"
        );
        let post = self.posts.get_by_id(post_id)?;
        let CommentCommand {
            name,
            email,
            content,
        } = command;

        let comment = self.repo.save(SaveCommentParams {
            id: None,
            name,
            email,
            content,
            post_id: post.id,
        })?;
        self.invalidate(post.id);
        Ok(comment)
    }

    fn list_by_post(&self, post_id: i64) -> Result<Vec<CommentRecord>, ServiceError> {
        let key = CacheKey::Post(post_id);
        if let Some(comments) = self
            .cache
            .get(Region::Comment, &key)
            .and_then(CachedValue::into_comments)
        {
            debug!(post_id, count = comments.len(), "comment list cache hit");
            return Ok(comments);
        }

        info!(
            target = "application::comments::list_by_post",
            post_id,
            "get list of comments by post id"
        );
        let epoch = self.cache.epoch(Region::Comment);
        let comments = self.repo.find_by_post(post_id)?;
        self.cache.fill(
            Region::Comment,
            key,
            CachedValue::Comments(comments.clone()),
            epoch,
        );
        Ok(comments)
    }

    fn get_by_id(&self, post_id: i64, comment_id: i64) -> Result<CommentRecord, ServiceError> {
        info!(
            target = "application::comments::get_by_id",
            post_id,
            comment_id,
            "get comment by id"
        );
        self.resolve(post_id, comment_id)
    }

    fn update(
        &self,
        post_id: i64,
        comment_id: i64,
        command: CommentCommand,
    ) -> Result<CommentRecord, ServiceError> {
        info!(
            target = "application::comments::update",
            post_id,
            comment_id,
            "get comment to update by id"
        );
        let existing = self.resolve(post_id, comment_id)?;
        let CommentCommand {
            name,
            email,
            content,
        } = command;

        let comment = self
            .repo
            .save(SaveCommentParams {
                id: Some(existing.id),
                name,
                email,
                content,
                post_id: existing.post_id,
            })
            .map_err(|err| ServiceError::from_repo(err, ResourceKind::Comment, comment_id))?;
        self.invalidate(existing.post_id);
        Ok(comment)
    }

    fn delete(&self, post_id: i64, comment_id: i64) -> Result<(), ServiceError> {
        info!(
            target = "application::comments::delete",
            post_id,
            comment_id,
            "get comment to delete by id"
        );
        let existing = self.resolve(post_id, comment_id)?;
        self.repo
            .delete(&existing)
            .map_err(|err| ServiceError::from_repo(err, ResourceKind::Comment, comment_id))?;
        self.invalidate(existing.post_id);
        Ok(())
    }
}
