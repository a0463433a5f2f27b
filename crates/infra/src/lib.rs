//! Infrastructure layer: repository implementations and caching.
//!
//! The in-memory repositories back tests and development; a production
//! deployment plugs a document-store client into the same traits. The
//! category snapshot cache sits in front of any `CategoryRepository` and is
//! invalidated by the administrative write path.

pub mod repository;

pub use repository::{
    CachedCategoryRepository, InMemoryCategoryRepository, InMemoryProductRepository,
};
