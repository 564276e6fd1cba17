use thiserror::Error;

use crate::{
    application::{pagination::PaginationError, repos::RepoError},
    domain::types::ResourceKind,
    infra::error::InfraError,
};

const OWNERSHIP_MISMATCH_MESSAGE: &str = "Comment does not belong to post";

/// Failure of a service operation. Every variant aborts the operation before
/// any mutation reaches the store.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{resource} not found with {field} : '{value}'")]
    NotFound {
        resource: ResourceKind,
        field: &'static str,
        value: i64,
    },
    #[error("{message}")]
    OwnershipMismatch { message: &'static str },
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl ServiceError {
    pub fn not_found(resource: ResourceKind, value: i64) -> Self {
        Self::NotFound {
            resource,
            field: "id",
            value,
        }
    }

    /// Lift a store failure for a known record, keeping a vanished row a
    /// `NotFound` of that resource rather than an opaque store error.
    pub fn from_repo(err: RepoError, resource: ResourceKind, value: i64) -> Self {
        match err {
            RepoError::NotFound => Self::not_found(resource, value),
            other => Self::Repo(other),
        }
    }

    pub fn ownership_mismatch() -> Self {
        Self::OwnershipMismatch {
            message: OWNERSHIP_MISMATCH_MESSAGE,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_ownership_mismatch(&self) -> bool {
        matches!(self, Self::OwnershipMismatch { .. })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_resource_field_and_value() {
        let err = ServiceError::not_found(ResourceKind::Category, 42);
        assert_eq!(err.to_string(), "Category not found with id : '42'");
        assert!(err.is_not_found());
        assert!(!err.is_ownership_mismatch());
    }

    #[test]
    fn ownership_mismatch_is_its_own_kind() {
        let err = ServiceError::ownership_mismatch();
        assert_eq!(err.to_string(), "Comment does not belong to post");
        assert!(err.is_ownership_mismatch());
        assert!(!err.is_not_found());
    }

    #[test]
    fn vanished_rows_become_not_found() {
        let err = ServiceError::from_repo(RepoError::NotFound, ResourceKind::Post, 3);
        assert_eq!(err.to_string(), "Post not found with id : '3'");

        let err = ServiceError::from_repo(
            RepoError::from_persistence("disk full"),
            ResourceKind::Post,
            3,
        );
        assert!(matches!(err, ServiceError::Repo(RepoError::Persistence(_))));
    }

    #[test]
    fn repo_errors_pass_through() {
        let err = ServiceError::from(RepoError::invalid_input("bad sort"));
        assert_eq!(err.to_string(), "invalid input: bad sort");
    }
}
