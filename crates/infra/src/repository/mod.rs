//! Implementations of the catalog's storage ports.

pub mod cached;
pub mod in_memory;

pub use cached::CachedCategoryRepository;
pub use in_memory::{InMemoryCategoryRepository, InMemoryProductRepository};
