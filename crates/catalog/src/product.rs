//! Product model, review aggregation helpers, and the product storage port.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, Entity, ExpectedVersion, ProductId, RepositoryError, UserId};

/// A single customer review attached to a product.
///
/// `reviewer_name` is a display-name snapshot taken at write time; renaming
/// the user later does not rewrite review history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user_id: UserId,
    pub reviewer_name: String,
    /// 1..=5, validated before append.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Catalog product record.
///
/// `num_reviews` and `rating` are derived from `reviews` and recomputed by
/// [`Product::append_review`] in the same step as the append; they are never
/// written independently. `version` is the persistence version used for
/// optimistic concurrency: 0 means never persisted, and the store bumps it
/// on every successful save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in the smallest currency unit (e.g. cents).
    pub price: u64,
    pub category_id: Option<CategoryId>,
    /// Append-only from the catalog's perspective.
    pub reviews: Vec<Review>,
    pub num_reviews: u32,
    /// Arithmetic mean of review ratings, 0.0 with no reviews.
    pub rating: f64,
    pub version: u64,
}

impl Product {
    /// A product with no reviews, not yet persisted.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: u64,
        category_id: Option<CategoryId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category_id,
            reviews: Vec::new(),
            num_reviews: 0,
            rating: 0.0,
            version: 0,
        }
    }

    /// The review written by `user_id`, if any.
    pub fn review_by(&self, user_id: UserId) -> Option<&Review> {
        self.reviews.iter().find(|r| r.user_id == user_id)
    }

    /// Append a review and recompute the derived fields in one step.
    ///
    /// Callers enforce the one-review-per-user invariant first; this method
    /// maintains `num_reviews == reviews.len()` and
    /// `rating == mean(reviews[].rating)`.
    pub fn append_review(&mut self, review: Review) {
        self.reviews.push(review);
        self.num_reviews = self.reviews.len() as u32;
        let sum: f64 = self.reviews.iter().map(|r| f64::from(r.rating)).sum();
        self.rating = sum / self.reviews.len() as f64;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Abstract product storage.
///
/// Calls are suspend points (storage round trips). Read operations never
/// mutate; `save` is a single atomic upsert under an optimistic version
/// check.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Products whose name contains `pattern`, case-insensitively.
    /// An empty pattern matches every product.
    async fn find_where_name_matches(
        &self,
        pattern: &str,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Count of the products `find_where_name_matches` would return.
    async fn count_where_name_matches(&self, pattern: &str) -> Result<usize, RepositoryError>;

    /// Products whose category id is in `ids`.
    async fn find_where_category_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Upsert; returns the persisted record with its version bumped.
    async fn save(
        &self,
        product: Product,
        expected: ExpectedVersion,
    ) -> Result<Product, RepositoryError>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn find_where_name_matches(
        &self,
        pattern: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        (**self).find_where_name_matches(pattern).await
    }

    async fn count_where_name_matches(&self, pattern: &str) -> Result<usize, RepositoryError> {
        (**self).count_where_name_matches(pattern).await
    }

    async fn find_where_category_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Product>, RepositoryError> {
        (**self).find_where_category_in(ids).await
    }

    async fn save(
        &self,
        product: Product,
        expected: ExpectedVersion,
    ) -> Result<Product, RepositoryError> {
        (**self).save(product, expected).await
    }
}
