//! Transitive category resolution.
//!
//! "Products in category X" must include everything tagged to subcategories
//! of X, so category scoping starts from the reflexive-transitive descendant
//! closure of the parent relation.

use std::collections::HashSet;

use storefront_core::{CategoryId, RepositoryError};

use crate::category::CategoryRepository;

/// Computes descendant closures over a [`CategoryRepository`].
///
/// Breadth-first fixed point: each round asks the repository for the
/// categories whose parent is in the current frontier and stops when a round
/// discovers nothing new. Category graphs are expected to be shallow, but
/// depth is never silently truncated.
#[derive(Debug, Clone)]
pub struct CategoryResolver<R> {
    categories: R,
    max_depth: Option<usize>,
}

impl<R> CategoryResolver<R>
where
    R: CategoryRepository,
{
    pub fn new(categories: R) -> Self {
        Self {
            categories,
            max_depth: None,
        }
    }

    /// Bound expansion to `max_depth` rounds below the root.
    ///
    /// Only for callers that need legacy shallow-traversal compatibility;
    /// the default is the full closure.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// The ids of `root` and every category below it.
    ///
    /// The result set doubles as the visited set: an id already collected is
    /// never re-expanded, so even a malformed (cyclic) graph terminates.
    pub async fn descendant_ids(
        &self,
        root: CategoryId,
    ) -> Result<HashSet<CategoryId>, RepositoryError> {
        let mut collected = HashSet::from([root]);
        let mut frontier = HashSet::from([root]);
        let mut round = 0usize;

        while !frontier.is_empty() {
            if self.max_depth.is_some_and(|max| round >= max) {
                break;
            }

            let found = self.categories.find_where_parent_in(&frontier).await?;
            let mut next = HashSet::new();
            for category in found {
                if collected.insert(category.id) {
                    next.insert(category.id);
                }
            }

            tracing::trace!(round, discovered = next.len(), "category closure round");
            frontier = next;
            round += 1;
        }

        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::test_support::StaticCategories;

    struct Graph {
        root: CategoryId,
        level1: CategoryId,
        level2: CategoryId,
        level3: CategoryId,
        unrelated: CategoryId,
        categories: Vec<Category>,
    }

    /// root -> level1 -> level2 -> level3, plus an unrelated root.
    fn deep_graph() -> Graph {
        let root = CategoryId::new();
        let level1 = CategoryId::new();
        let level2 = CategoryId::new();
        let level3 = CategoryId::new();
        let unrelated = CategoryId::new();

        let categories = vec![
            Category::new(root, "Root", None),
            Category::new(level1, "Level 1", Some(root)),
            Category::new(level2, "Level 2", Some(level1)),
            Category::new(level3, "Level 3", Some(level2)),
            Category::new(unrelated, "Unrelated", None),
        ];

        Graph {
            root,
            level1,
            level2,
            level3,
            unrelated,
            categories,
        }
    }

    #[tokio::test]
    async fn closure_includes_the_root_itself() {
        let root = CategoryId::new();
        let resolver = CategoryResolver::new(StaticCategories(vec![Category::new(
            root, "Root", None,
        )]));

        let ids = resolver.descendant_ids(root).await.unwrap();

        assert_eq!(ids, HashSet::from([root]));
    }

    #[tokio::test]
    async fn closure_reaches_past_two_levels() {
        let graph = deep_graph();
        let resolver = CategoryResolver::new(StaticCategories(graph.categories));

        let ids = resolver.descendant_ids(graph.root).await.unwrap();

        assert_eq!(
            ids,
            HashSet::from([graph.root, graph.level1, graph.level2, graph.level3])
        );
        assert!(!ids.contains(&graph.unrelated));
    }

    #[tokio::test]
    async fn max_depth_bounds_the_expansion() {
        let graph = deep_graph();
        let resolver = CategoryResolver::new(StaticCategories(graph.categories)).with_max_depth(2);

        let ids = resolver.descendant_ids(graph.root).await.unwrap();

        assert_eq!(ids, HashSet::from([graph.root, graph.level1, graph.level2]));
    }

    #[tokio::test]
    async fn cyclic_input_terminates() {
        // Malformed graph the write path should have rejected: a <-> b.
        let a = CategoryId::new();
        let b = CategoryId::new();
        let categories = vec![
            Category::new(a, "A", Some(b)),
            Category::new(b, "B", Some(a)),
        ];
        let resolver = CategoryResolver::new(StaticCategories(categories));

        let ids = resolver.descendant_ids(a).await.unwrap();

        assert_eq!(ids, HashSet::from([a, b]));
    }

    #[tokio::test]
    async fn unknown_root_resolves_to_itself() {
        let resolver = CategoryResolver::new(StaticCategories(vec![]));
        let root = CategoryId::new();

        let ids = resolver.descendant_ids(root).await.unwrap();

        assert_eq!(ids, HashSet::from([root]));
    }
}
