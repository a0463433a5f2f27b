//! Review submission: the one mutating operation of the catalog core.

use chrono::Utc;

use storefront_core::{
    CatalogError, CatalogResult, ExpectedVersion, ProductId, RepositoryError, UserId,
};

use crate::product::{Product, ProductRepository, Review};

/// How many times a conflicted save is rerun before giving up.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Command: add a review to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddReview {
    pub product_id: ProductId,
    pub user_id: UserId,
    /// Display-name snapshot stored with the review.
    pub reviewer_name: String,
    pub rating: u8,
    pub comment: String,
}

/// Appends reviews under the one-review-per-(product, user) invariant and
/// keeps the aggregate rating consistent.
///
/// The read-modify-write runs under an optimistic version check: the product
/// is loaded, checked, mutated, and saved with [`ExpectedVersion::Exact`].
/// A concurrent writer makes the save fail with a concurrency conflict, and
/// the whole sequence (all checks included) reruns against fresh state a
/// bounded number of times. Reviews for distinct products never contend, and
/// no exit path (success, validation failure, not-found, conflict) leaves
/// partial state behind.
#[derive(Debug, Clone)]
pub struct ReviewService<P> {
    products: P,
    max_retries: u32,
}

impl<P> ReviewService<P>
where
    P: ProductRepository,
{
    pub fn new(products: P) -> Self {
        Self {
            products,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the conflict retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Add a review and recompute the product's aggregate rating.
    ///
    /// Returns the persisted product on success. Validation failures and the
    /// uniqueness violation leave the product untouched.
    pub async fn add_review(&self, command: AddReview) -> CatalogResult<Product> {
        let mut attempt = 0u32;
        loop {
            match self.try_add(&command).await {
                Err(CatalogError::Repository(RepositoryError::Concurrency(reason))) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        tracing::warn!(
                            product_id = %command.product_id,
                            attempts = attempt,
                            "review save conflicted, retries exhausted"
                        );
                        return Err(CatalogError::ConcurrentModification);
                    }
                    tracing::debug!(
                        product_id = %command.product_id,
                        attempt,
                        %reason,
                        "review save conflicted, retrying against fresh state"
                    );
                }
                other => return other,
            }
        }
    }

    async fn try_add(&self, command: &AddReview) -> CatalogResult<Product> {
        let mut product = self
            .products
            .find_by_id(command.product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        if !(1..=5).contains(&command.rating) {
            return Err(CatalogError::InvalidRating(command.rating));
        }

        if product.review_by(command.user_id).is_some() {
            return Err(CatalogError::AlreadyReviewed);
        }

        let expected = ExpectedVersion::Exact(product.version);
        product.append_review(Review {
            user_id: command.user_id,
            reviewer_name: command.reviewer_name.clone(),
            rating: command.rating,
            comment: command.comment.clone(),
            created_at: Utc::now(),
        });

        Ok(self.products.save(product, expected).await?)
    }
}
