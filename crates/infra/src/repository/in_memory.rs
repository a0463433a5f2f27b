//! In-memory repositories.
//!
//! Intended for tests/dev. Not optimized for performance. Listings are
//! ordered by ascending id (UUIDv7, so creation order) to keep pagination
//! and tie-breaks deterministic.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use storefront_catalog::{Category, CategoryRepository, Product, ProductRepository};
use storefront_core::{CategoryId, ExpectedVersion, ProductId, RepositoryError};

fn poisoned() -> RepositoryError {
    RepositoryError::backend("lock poisoned")
}

/// In-memory category storage.
#[derive(Debug, Default)]
pub struct InMemoryCategoryRepository {
    records: RwLock<HashMap<CategoryId, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a category.
    pub fn insert(&self, category: Category) {
        if let Ok(mut map) = self.records.write() {
            map.insert(category.id, category);
        }
    }

    /// Remove a category. Children keep their dangling parent id; the tree
    /// builder demotes them to roots.
    pub fn remove(&self, id: CategoryId) {
        if let Ok(mut map) = self.records.write() {
            map.remove(&id);
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let map = self.records.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let map = self.records.read().map_err(|_| poisoned())?;
        let mut all: Vec<Category> = map.values().cloned().collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    async fn find_where_parent_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Category>, RepositoryError> {
        let map = self.records.read().map_err(|_| poisoned())?;
        let mut matching: Vec<Category> = map
            .values()
            .filter(|c| c.parent_id.is_some_and(|p| ids.contains(&p)))
            .cloned()
            .collect();
        matching.sort_by_key(|c| c.id);
        Ok(matching)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let map = self.records.read().map_err(|_| poisoned())?;
        Ok(map.len())
    }
}

/// In-memory product storage with optimistic versioned saves.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    records: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a product, bypassing the version check.
    pub fn insert(&self, product: Product) {
        if let Ok(mut map) = self.records.write() {
            map.insert(product.id, product);
        }
    }

    pub fn remove(&self, id: ProductId) {
        if let Ok(mut map) = self.records.write() {
            map.remove(&id);
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let map = self.records.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn find_where_name_matches(
        &self,
        pattern: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        let needle = pattern.to_lowercase();
        let map = self.records.read().map_err(|_| poisoned())?;
        let mut matching: Vec<Product> = map
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matching.sort_by_key(|p| p.id);
        Ok(matching)
    }

    async fn count_where_name_matches(&self, pattern: &str) -> Result<usize, RepositoryError> {
        let needle = pattern.to_lowercase();
        let map = self.records.read().map_err(|_| poisoned())?;
        Ok(map
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .count())
    }

    async fn find_where_category_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let map = self.records.read().map_err(|_| poisoned())?;
        let mut matching: Vec<Product> = map
            .values()
            .filter(|p| p.category_id.is_some_and(|c| ids.contains(&c)))
            .cloned()
            .collect();
        matching.sort_by_key(|p| p.id);
        Ok(matching)
    }

    /// The version check and the write happen under one lock, so two
    /// writers racing on the same product cannot both pass the check.
    async fn save(
        &self,
        mut product: Product,
        expected: ExpectedVersion,
    ) -> Result<Product, RepositoryError> {
        let mut map = self.records.write().map_err(|_| poisoned())?;
        let current = map.get(&product.id).map(|p| p.version).unwrap_or(0);
        expected.check(current)?;
        product.version = current + 1;
        map.insert(product.id, product.clone());
        Ok(product)
    }
}
