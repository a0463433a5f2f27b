//! Product catalog read operations.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use storefront_core::{CatalogError, CatalogResult, CategoryId, ProductId};

use crate::category::CategoryRepository;
use crate::hierarchy::CategoryResolver;
use crate::pagination::paginate;
use crate::product::{Product, ProductRepository};

/// Products per listing page, the storefront default.
pub const PRODUCT_PAGE_SIZE: usize = 10;

/// Default number of products returned by the top-rated listing.
pub const DEFAULT_TOP_RATED: usize = 3;

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: usize,
    pub page_count: usize,
}

/// Read-only product queries: keyword search, category scoping, top-rated.
///
/// Each call reflects some consistent snapshot of the repositories at call
/// time; no ordering is promised across distinct calls. Empty result sets
/// are valid, not errors, and repository failures propagate unchanged.
#[derive(Debug, Clone)]
pub struct ProductQuery<P, C> {
    products: P,
    resolver: CategoryResolver<C>,
    page_size: usize,
}

impl<P, C> ProductQuery<P, C>
where
    P: ProductRepository,
    C: CategoryRepository,
{
    pub fn new(products: P, resolver: CategoryResolver<C>) -> Self {
        Self {
            products,
            resolver,
            page_size: PRODUCT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Keyword listing.
    ///
    /// `keyword` matches product names case-insensitively as a substring;
    /// `None` (or an empty string) matches every product. `page` is
    /// 1-indexed, values below 1 treated as 1.
    pub async fn list(&self, keyword: Option<&str>, page: usize) -> CatalogResult<ProductPage> {
        let pattern = keyword.unwrap_or("");
        let total = self.products.count_where_name_matches(pattern).await?;
        let window = paginate(total, self.page_size, page);
        let items = self
            .products
            .find_where_name_matches(pattern)
            .await?
            .into_iter()
            .skip(window.offset)
            .take(self.page_size)
            .collect();

        Ok(ProductPage {
            items,
            page: page.max(1),
            page_count: window.page_count,
        })
    }

    /// Every product in `category_id` or any category below it.
    ///
    /// Deliberately unpaginated: category pages render the full matching
    /// set, mirroring the storefront's category screens.
    pub async fn list_in_category(&self, category_id: CategoryId) -> CatalogResult<Vec<Product>> {
        let scope = self.resolver.descendant_ids(category_id).await?;
        Ok(self.products.find_where_category_in(&scope).await?)
    }

    /// The `limit` best-rated products, rating descending.
    ///
    /// Ties break by ascending id so the ordering is deterministic across
    /// stores.
    pub async fn top_rated(&self, limit: usize) -> CatalogResult<Vec<Product>> {
        let mut all = self.products.find_where_name_matches("").await?;
        all.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        all.truncate(limit);
        Ok(all)
    }

    /// Single product lookup.
    pub async fn get(&self, id: ProductId) -> CatalogResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }
}
