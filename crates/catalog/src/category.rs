//! Category model, flat-to-tree conversion, and category-side queries.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use storefront_core::{CatalogError, CatalogResult, CategoryId, Entity, RepositoryError};

use crate::pagination::paginate;

/// Categories per listing page on the administrative screens.
pub const CATEGORY_PAGE_SIZE: usize = 10;

/// Catalog category. `parent_id == None` marks a root.
///
/// The parent graph is kept acyclic by the administrative write path; the
/// readers in this crate tolerate a missing or deleted parent (the child is
/// treated as a root) and never loop on malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, parent_id: Option<CategoryId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> CategoryId {
        self.id
    }
}

/// Node of the navigation menu forest.
///
/// Pure view projection over [`Category`] records; not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTreeNode {
    pub id: CategoryId,
    pub title: String,
    pub children: Vec<CategoryTreeNode>,
}

/// Convert a flat, parent-referencing category list into a menu forest.
///
/// Arena build: one pass indexes every id, a second pass attaches each entry
/// to its parent's child list when the parent is present in the input and
/// demotes it to a root otherwise (a `parent_id` referencing a deleted
/// category is not an error). Children and roots keep first-seen input order
/// (stable, not sorted). O(n) construction; assembling the output recurses
/// to tree depth.
pub fn build_category_tree(categories: &[Category]) -> Vec<CategoryTreeNode> {
    let index_of: HashMap<CategoryId, usize> = categories
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.id, idx))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); categories.len()];
    let mut roots: Vec<usize> = Vec::new();

    for (idx, category) in categories.iter().enumerate() {
        match category.parent_id.and_then(|p| index_of.get(&p)) {
            Some(&parent_idx) => children[parent_idx].push(idx),
            None => roots.push(idx),
        }
    }

    roots
        .iter()
        .map(|&idx| assemble(categories, &children, idx))
        .collect()
}

fn assemble(categories: &[Category], children: &[Vec<usize>], idx: usize) -> CategoryTreeNode {
    CategoryTreeNode {
        id: categories[idx].id,
        title: categories[idx].name.clone(),
        children: children[idx]
            .iter()
            .map(|&child| assemble(categories, children, child))
            .collect(),
    }
}

/// Abstract category storage.
///
/// Read-only from the catalog's perspective; category writes happen on the
/// administrative path, which must invalidate any snapshot cache layered
/// over this trait. Calls are suspend points (storage round trips).
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Categories whose parent id is in `ids`.
    async fn find_where_parent_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Category>, RepositoryError>;

    async fn count(&self) -> Result<usize, RepositoryError>;
}

#[async_trait]
impl<R> CategoryRepository for Arc<R>
where
    R: CategoryRepository + ?Sized,
{
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        (**self).find_all().await
    }

    async fn find_where_parent_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Category>, RepositoryError> {
        (**self).find_where_parent_in(ids).await
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        (**self).count().await
    }
}

/// One page of the flat category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPage {
    pub items: Vec<Category>,
    pub page: usize,
    pub page_count: usize,
}

/// Read-side category operations: navigation menu, paginated listing,
/// single lookup.
#[derive(Debug, Clone)]
pub struct CategoryQuery<R> {
    categories: R,
    page_size: usize,
}

impl<R> CategoryQuery<R>
where
    R: CategoryRepository,
{
    pub fn new(categories: R) -> Self {
        Self {
            categories,
            page_size: CATEGORY_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Navigation menu forest over the full category list.
    pub async fn menu(&self) -> CatalogResult<Vec<CategoryTreeNode>> {
        let all = self.categories.find_all().await?;
        Ok(build_category_tree(&all))
    }

    /// Flat listing, one page at a time.
    ///
    /// `page` is 1-indexed; values below 1 are treated as 1.
    pub async fn list(&self, page: usize) -> CatalogResult<CategoryPage> {
        let total = self.categories.count().await?;
        let window = paginate(total, self.page_size, page);
        let items = self
            .categories
            .find_all()
            .await?
            .into_iter()
            .skip(window.offset)
            .take(self.page_size)
            .collect();

        Ok(CategoryPage {
            items,
            page: page.max(1),
            page_count: window.page_count,
        })
    }

    /// Single category lookup.
    pub async fn get(&self, id: CategoryId) -> CatalogResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)
    }
}
