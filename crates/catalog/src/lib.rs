//! Category hierarchy and catalog-query domain.
//!
//! This crate contains the business rules of the storefront catalog: flat
//! category lists become navigable menu trees, a category scope expands to
//! its full descendant closure so listings include subcategories, product
//! listings are searched and paginated, and reviews are appended under a
//! one-review-per-user invariant with the aggregate rating recomputed in the
//! same write.
//!
//! Storage access goes through the async repository traits defined next to
//! the models. Implementations live elsewhere (`storefront-infra` provides
//! in-memory ones for tests/dev); every repository call is a suspend point.

pub mod category;
pub mod hierarchy;
pub mod pagination;
pub mod product;
pub mod query;
pub mod review;

pub use category::{
    Category, CategoryPage, CategoryQuery, CategoryRepository, CategoryTreeNode,
    build_category_tree,
};
pub use hierarchy::CategoryResolver;
pub use pagination::{PageWindow, paginate};
pub use product::{Product, ProductRepository, Review};
pub use query::{DEFAULT_TOP_RATED, ProductPage, ProductQuery};
pub use review::{AddReview, ReviewService};

#[cfg(test)]
pub(crate) mod test_support;
