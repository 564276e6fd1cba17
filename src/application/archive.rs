//! Import/export of content as a TOML archive.
//!
//! Archive ids are local to the file: posts point at archive category ids and
//! comments at archive post ids. Import replays every row through the
//! services, so each post and comment is validated against its parent, and
//! remaps the links to the ids the store assigns.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    application::{
        categories::CategoryCommand, comments::CommentCommand, error::AppError,
        error::ServiceError, posts::PostCommand, services::ContentServices,
    },
    domain::types::ResourceKind,
    infra::error::InfraError,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentArchive {
    #[serde(default)]
    pub categories: Vec<CategorySnapshot>,
    #[serde(default)]
    pub posts: Vec<PostSnapshot>,
    #[serde(default)]
    pub comments: Vec<CommentSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSnapshot {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSnapshot {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub content: String,
    pub post_id: i64,
}

/// Outcome of an import: what was stored and which rows were refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub categories: usize,
    pub posts: usize,
    pub comments: usize,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub resource: ResourceKind,
    pub archive_id: i64,
    pub reason: String,
}

impl ContentArchive {
    /// Read and decode an archive file.
    pub fn read(path: &Path) -> Result<Self, AppError> {
        let data = fs::read_to_string(path).map_err(|err| AppError::from(InfraError::Io(err)))?;
        toml::from_str(&data).map_err(|err| AppError::validation(format!("invalid archive: {err}")))
    }

    /// Encode and write the archive to `path`.
    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        let encoded = toml::to_string_pretty(self)
            .map_err(|err| AppError::unexpected(format!("failed to encode archive: {err}")))?;
        fs::write(path, encoded).map_err(|err| AppError::from(InfraError::Io(err)))
    }
}

/// Replay an archive through the services.
///
/// Rows naming a missing or refused parent are reported in
/// [`ImportReport::rejected`]; any other failure aborts the import.
pub fn import_archive(
    services: &ContentServices,
    archive: &ContentArchive,
) -> Result<ImportReport, AppError> {
    let mut report = ImportReport::default();

    let mut category_ids = HashMap::new();
    for category in &archive.categories {
        if category_ids.contains_key(&category.id) {
            report.reject(ResourceKind::Category, category.id, "duplicate archive id");
            continue;
        }
        let stored = services.categories.add(CategoryCommand {
            name: category.name.clone(),
            description: category.description.clone(),
        })?;
        category_ids.insert(category.id, stored.id);
        report.categories += 1;
    }

    let mut post_ids = HashMap::new();
    let mut seen_posts = HashSet::new();
    for post in &archive.posts {
        if !seen_posts.insert(post.id) {
            report.reject(ResourceKind::Post, post.id, "duplicate archive id");
            continue;
        }
        let Some(&category_id) = category_ids.get(&post.category_id) else {
            let err = ServiceError::not_found(ResourceKind::Category, post.category_id);
            report.reject(ResourceKind::Post, post.id, err.to_string());
            continue;
        };
        let outcome = services.posts.create(PostCommand {
            title: post.title.clone(),
            description: post.description.clone(),
            content: post.content.clone(),
            category_id,
        });
        match outcome {
            Ok(stored) => {
                post_ids.insert(post.id, stored.id);
                report.posts += 1;
            }
            Err(err) if err.is_not_found() => {
                report.reject(ResourceKind::Post, post.id, err.to_string());
            }
            Err(err) => return Err(err.into()),
        }
    }

    let mut seen_comments = HashSet::new();
    for comment in &archive.comments {
        if !seen_comments.insert(comment.id) {
            report.reject(ResourceKind::Comment, comment.id, "duplicate archive id");
            continue;
        }
        let Some(&post_id) = post_ids.get(&comment.post_id) else {
            let err = ServiceError::not_found(ResourceKind::Post, comment.post_id);
            report.reject(ResourceKind::Comment, comment.id, err.to_string());
            continue;
        };
        let outcome = services.comments.create(
            post_id,
            CommentCommand {
                name: comment.name.clone(),
                email: comment.email.clone(),
                content: comment.content.clone(),
            },
        );
        match outcome {
            Ok(_) => report.comments += 1,
            Err(err) if err.is_not_found() => {
                report.reject(ResourceKind::Comment, comment.id, err.to_string());
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!(
        target = "application::archive::import_archive",
        categories = report.categories,
        posts = report.posts,
        comments = report.comments,
        rejected = report.rejected.len(),
        "archive imported"
    );
    Ok(report)
}

/// Collect everything reachable through the services into an archive
/// keyed by store ids. Posts whose category is gone are not reachable.
pub fn export_archive(services: &ContentServices) -> Result<ContentArchive, ServiceError> {
    let mut archive = ContentArchive::default();

    for category in services.categories.list()? {
        for post in services.posts.list_by_category(category.id)? {
            for comment in services.comments.list_by_post(post.id)? {
                archive.comments.push(CommentSnapshot {
                    id: comment.id,
                    name: comment.name,
                    email: comment.email,
                    content: comment.content,
                    post_id: comment.post_id,
                });
            }
            archive.posts.push(PostSnapshot {
                id: post.id,
                title: post.title,
                description: post.description,
                content: post.content,
                category_id: post.category_id,
            });
        }
        archive.categories.push(CategorySnapshot {
            id: category.id,
            name: category.name,
            description: category.description,
        });
    }

    archive.categories.sort_by_key(|category| category.id);
    archive.posts.sort_by_key(|post| post.id);
    archive.comments.sort_by_key(|comment| comment.id);
    Ok(archive)
}

impl ImportReport {
    fn reject(&mut self, resource: ResourceKind, archive_id: i64, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(
            target = "application::archive::import_archive",
            resource = resource.as_str(),
            archive_id,
            reason = reason.as_str(),
            "archive row rejected"
        );
        self.rejected.push(Rejection {
            resource,
            archive_id,
            reason,
        });
    }
}
