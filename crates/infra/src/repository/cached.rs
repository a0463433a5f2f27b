//! Snapshot cache over a category repository.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use storefront_catalog::{Category, CategoryRepository};
use storefront_core::{CategoryId, RepositoryError};

/// Caches the full category list in front of a slower repository.
///
/// The category graph changes rarely and is read on every catalog request,
/// so all reads are served from one cached snapshot of `find_all`. The
/// administrative write path calls
/// [`invalidate`](CachedCategoryRepository::invalidate) after any category
/// create/update/delete; until then reads may be stale, bounded by the
/// invalidation latency. Reads take no lock across a suspend point: the
/// snapshot guard is dropped before the inner repository is awaited.
#[derive(Debug)]
pub struct CachedCategoryRepository<R> {
    inner: R,
    snapshot: RwLock<Option<Vec<Category>>>,
}

impl<R> CachedCategoryRepository<R>
where
    R: CategoryRepository,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            snapshot: RwLock::new(None),
        }
    }

    /// Drop the snapshot; the next read reloads from the inner repository.
    pub fn invalidate(&self) {
        if let Ok(mut snap) = self.snapshot.write() {
            tracing::debug!("category snapshot invalidated");
            *snap = None;
        }
    }

    async fn load(&self) -> Result<Vec<Category>, RepositoryError> {
        {
            let snap = self
                .snapshot
                .read()
                .map_err(|_| RepositoryError::backend("lock poisoned"))?;
            if let Some(cached) = snap.as_ref() {
                return Ok(cached.clone());
            }
        }

        let fresh = self.inner.find_all().await?;
        let mut snap = self
            .snapshot
            .write()
            .map_err(|_| RepositoryError::backend("lock poisoned"))?;
        *snap = Some(fresh.clone());
        Ok(fresh)
    }
}

#[async_trait]
impl<R> CategoryRepository for CachedCategoryRepository<R>
where
    R: CategoryRepository,
{
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        Ok(self.load().await?.into_iter().find(|c| c.id == id))
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        self.load().await
    }

    async fn find_where_parent_in(
        &self,
        ids: &HashSet<CategoryId>,
    ) -> Result<Vec<Category>, RepositoryError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|c| c.parent_id.is_some_and(|p| ids.contains(&p)))
            .collect())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.load().await?.len())
    }
}
