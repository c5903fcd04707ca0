//! Data-access layer for the catalog listings the billboard picker reads.
//!
//! [`CachedCatalog`] sits in front of any [`CatalogSource`] and gives every
//! query key three guarantees:
//! - a fresh cached result is returned without touching the source,
//! - a request for a key that is already in flight joins that request,
//! - a finished request stores its result under its own key only.
//!
//! Failures are handed back to every waiter and never cached, so the next
//! request for that key retries.

use crate::catalog::{Billboard, BillboardFilter, Region};
use crate::query_cache::QueryCache;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Read side of the catalog API.
pub trait CatalogSource {
    fn list_regions(&self) -> LocalBoxFuture<'static, Result<Vec<Region>, CatalogError>>;

    fn list_billboards(
        &self,
        filter: BillboardFilter,
    ) -> LocalBoxFuture<'static, Result<Vec<Billboard>, CatalogError>>;
}

pub trait Clock {
    fn now_ms(&self) -> u64;
}

type PendingFetch<V> = Shared<LocalBoxFuture<'static, Result<V, CatalogError>>>;

struct QuerySlot<K, V> {
    cache: RefCell<QueryCache<K, V>>,
    in_flight: RefCell<HashMap<K, PendingFetch<V>>>,
}

impl<K, V> QuerySlot<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + 'static,
{
    fn new(ttl_ms: u64) -> Self {
        Self {
            cache: RefCell::new(QueryCache::new(ttl_ms)),
            in_flight: RefCell::new(HashMap::new()),
        }
    }

    async fn fetch(
        &self,
        key: K,
        clock: &dyn Clock,
        start: impl FnOnce() -> LocalBoxFuture<'static, Result<V, CatalogError>>,
    ) -> Result<V, CatalogError> {
        if let Some(value) = self.cache.borrow().get(&key, clock.now_ms()) {
            return Ok(value.clone());
        }

        let pending = self
            .in_flight
            .borrow_mut()
            .entry(key.clone())
            .or_insert_with(|| start().shared())
            .clone();
        let result = pending.clone().await;

        // Whichever waiter wakes first retires the request; a newer request
        // under the same key is left alone.
        let mut in_flight = self.in_flight.borrow_mut();
        if in_flight
            .get(&key)
            .is_some_and(|current| current.ptr_eq(&pending))
        {
            in_flight.remove(&key);
            if let Ok(value) = &result {
                self.cache
                    .borrow_mut()
                    .insert(key, value.clone(), clock.now_ms());
            }
        }
        result
    }

    fn invalidate(&self, key: &K) {
        self.cache.borrow_mut().invalidate(key);
    }

}

struct CatalogInner {
    source: Rc<dyn CatalogSource>,
    clock: Rc<dyn Clock>,
    regions: QuerySlot<(), Rc<Vec<Region>>>,
    billboards: QuerySlot<BillboardFilter, Rc<Vec<Billboard>>>,
}

/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct CachedCatalog {
    inner: Rc<CatalogInner>,
}

impl std::fmt::Debug for CachedCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCatalog")
            .field("ttl_ms", &self.inner.regions.cache.borrow().ttl_ms())
            .finish()
    }
}

impl CachedCatalog {
    pub fn new(source: Rc<dyn CatalogSource>, clock: Rc<dyn Clock>, ttl_ms: u64) -> Self {
        Self {
            inner: Rc::new(CatalogInner {
                source,
                clock,
                regions: QuerySlot::new(ttl_ms),
                billboards: QuerySlot::new(ttl_ms),
            }),
        }
    }

    pub async fn regions(&self) -> Result<Rc<Vec<Region>>, CatalogError> {
        let inner = &self.inner;
        inner
            .regions
            .fetch((), inner.clock.as_ref(), || {
                inner.source.list_regions().map(|result| result.map(Rc::new)).boxed_local()
            })
            .await
    }

    pub async fn billboards(&self, filter: BillboardFilter) -> Result<Rc<Vec<Billboard>>, CatalogError> {
        let inner = &self.inner;
        let request = filter.clone();
        inner
            .billboards
            .fetch(filter, inner.clock.as_ref(), || {
                inner
                    .source
                    .list_billboards(request)
                    .map(|result| result.map(Rc::new))
                    .boxed_local()
            })
            .await
    }

    pub fn invalidate_regions(&self) {
        self.inner.regions.invalidate(&());
    }

    pub fn invalidate_billboards(&self, filter: &BillboardFilter) {
        self.inner.billboards.invalidate(filter);
    }
}
