//! Catalog error model.

use thiserror::Error;

/// Result type used across the catalog layer.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Domain-level error surfaced to the request-handling boundary.
///
/// Keep this focused on deterministic, user-presentable failures.
/// Infrastructure failures pass through as [`RepositoryError`] unchanged;
/// nothing here is silently swallowed or retried (the bounded
/// concurrency-conflict retry happens before `ConcurrentModification` is
/// surfaced).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The referenced product does not exist.
    #[error("product not found")]
    ProductNotFound,

    /// The referenced category does not exist.
    #[error("category not found")]
    CategoryNotFound,

    /// Uniqueness violation on (product, user): this user already reviewed.
    #[error("product already reviewed")]
    AlreadyReviewed,

    /// Rating outside the accepted 1..=5 range.
    #[error("invalid rating {0}, expected 1..=5")]
    InvalidRating(u8),

    /// Optimistic-lock retries exhausted on a review append.
    #[error("concurrent modification, retries exhausted")]
    ConcurrentModification,

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Infrastructure failure, propagated unchanged.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CatalogError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

/// Repository operation error (infrastructure).
///
/// These are storage/concurrency failures, as opposed to the domain failures
/// in [`CatalogError`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Optimistic concurrency check failed on save.
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    /// The storage backend failed or was unreachable.
    #[error("storage backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn concurrency(msg: impl Into<String>) -> Self {
        Self::Concurrency(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(anyhow::Error::msg(msg.into()))
    }
}
