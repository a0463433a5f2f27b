//! Shared repository fakes for the unit tests.
//!
//! `storefront-infra` ships the real in-memory repositories; these stay
//! deliberately small so the domain tests depend on nothing outside this
//! crate.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use storefront_core::{CategoryId, ExpectedVersion, ProductId, RepositoryError};

use crate::category::{Category, CategoryRepository};
use crate::product::{Product, ProductRepository};

/// Immutable category fixture backed by a plain list.
pub struct StaticCategories(pub Vec<Category>);

#[async_trait]
impl CategoryRepository for StaticCategories {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.0.iter().find(|c| c.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.0.clone())
    }

    async fn find_where_parent_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Category>, RepositoryError> {
        Ok(self
            .0
            .iter()
            .filter(|c| c.parent_id.is_some_and(|p| ids.contains(&p)))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.0.len())
    }
}

/// Mutable product fixture with the same optimistic save semantics as the
/// real in-memory repository.
#[derive(Default)]
pub struct ProductsFixture {
    records: RwLock<HashMap<ProductId, Product>>,
}

impl ProductsFixture {
    pub fn seeded(products: impl IntoIterator<Item = Product>) -> Self {
        let fixture = Self::default();
        {
            let mut map = fixture.records.write().unwrap();
            for product in products {
                map.insert(product.id, product);
            }
        }
        fixture
    }
}

fn id_sorted(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by_key(|p| p.id);
    products
}

#[async_trait]
impl ProductRepository for ProductsFixture {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.records.read().unwrap().get(&id).cloned())
    }

    async fn find_where_name_matches(
        &self,
        pattern: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        let needle = pattern.to_lowercase();
        let matching = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(id_sorted(matching))
    }

    async fn count_where_name_matches(&self, pattern: &str) -> Result<usize, RepositoryError> {
        Ok(self.find_where_name_matches(pattern).await?.len())
    }

    async fn find_where_category_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let matching = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|p| p.category_id.is_some_and(|c| ids.contains(&c)))
            .cloned()
            .collect();
        Ok(id_sorted(matching))
    }

    async fn save(
        &self,
        mut product: Product,
        expected: ExpectedVersion,
    ) -> Result<Product, RepositoryError> {
        let mut map = self.records.write().unwrap();
        let current = map.get(&product.id).map(|p| p.version).unwrap_or(0);
        expected.check(current)?;
        product.version = current + 1;
        map.insert(product.id, product.clone());
        Ok(product)
    }
}

/// Decorator that fails the next `failures` saves with a concurrency
/// conflict before delegating, for retry-path tests.
pub struct ConflictingProducts<P> {
    inner: P,
    failures: AtomicU32,
}

impl<P> ConflictingProducts<P> {
    pub fn failing(inner: P, failures: u32) -> Self {
        Self {
            inner,
            failures: AtomicU32::new(failures),
        }
    }
}

#[async_trait]
impl<P> ProductRepository for ConflictingProducts<P>
where
    P: ProductRepository,
{
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    async fn find_where_name_matches(
        &self,
        pattern: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        self.inner.find_where_name_matches(pattern).await
    }

    async fn count_where_name_matches(&self, pattern: &str) -> Result<usize, RepositoryError> {
        self.inner.count_where_name_matches(pattern).await
    }

    async fn find_where_category_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        self.inner.find_where_category_in(ids).await
    }

    async fn save(
        &self,
        product: Product,
        expected: ExpectedVersion,
    ) -> Result<Product, RepositoryError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != u32::MAX {
                self.failures.store(remaining - 1, Ordering::SeqCst);
            }
            return Err(RepositoryError::concurrency("injected conflict"));
        }
        self.inner.save(product, expected).await
    }
}
