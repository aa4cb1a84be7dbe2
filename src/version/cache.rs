//! Run-scoped catalog cache
//!
//! Each catalog key is fetched at most once for the lifetime of the cache.
//! Concurrent requests for the same key wait on the single in-flight fetch
//! instead of issuing their own, and share its outcome.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::platform::CatalogKey;
use crate::version::error::CatalogError;
use crate::version::types::Catalog;

type Entry = Arc<OnceCell<Result<Arc<Catalog>, CatalogError>>>;

#[derive(Default)]
pub struct CatalogCache {
    entries: Mutex<HashMap<CatalogKey, Entry>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog for `key`, running `fetch` if it is absent.
    ///
    /// Callers waiting on a fetch that fails receive the same error. The
    /// entry is then dropped, so only a later request fetches again.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &CatalogKey,
        fetch: F,
    ) -> Result<Arc<Catalog>, CatalogError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Catalog, CatalogError>>,
    {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        if let Some(Ok(catalog)) = cell.get() {
            debug!("Catalog cache hit for {}", key);
            return Ok(Arc::clone(catalog));
        }

        let outcome = cell
            .get_or_init(|| async move { fetch().await.map(Arc::new) })
            .await;

        if outcome.is_err() {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            if entries
                .get(key)
                .is_some_and(|current| Arc::ptr_eq(current, &cell))
            {
                entries.remove(key);
            }
        }

        outcome.clone()
    }

    /// Return the catalog for `key` if it has already been fetched
    pub fn get(&self, key: &CatalogKey) -> Option<Arc<Catalog>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .and_then(|cell| cell.get())
            .and_then(|outcome| outcome.as_ref().ok().cloned())
    }
}
