//! Cache-aside decorator around a [`DivisionDataService`].
//!
//! The cache exists purely to protect anonymous traffic from read
//! amplification: authenticated callers with any access claim always
//! hit the underlying service, and a no-cache request bypasses the
//! cache for that single call without repopulating it. This is a soft
//! cache; concurrent writers racing on one key are tolerated, last
//! write wins.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::cache::types::{CacheKey, CacheStats, CachedEntry, CachedPayload};
use crate::config::Config;
use crate::division::dto_factory::{DivisionDataDto, DivisionDto};
use crate::division::service::{DivisionDataService, RequestContext};
use crate::error::AppError;
use crate::models::{Division, DivisionDataFilter, DivisionId, SeasonId};

/// Wraps an owned inner service with an owned LRU cache, composed
/// explicitly at startup.
pub struct CachingDivisionService<S> {
    inner: S,
    cache: RwLock<LruCache<CacheKey, CachedEntry>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: DivisionDataService + Sync> CachingDivisionService<S> {
    pub fn new(inner: S, capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(crate::constants::cache::DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        CachingDivisionService {
            inner,
            cache: RwLock::new(LruCache::new(capacity)),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(inner: S, config: &Config) -> Self {
        Self::new(
            inner,
            config.cache_capacity,
            Duration::from_secs(config.cache_ttl_seconds),
        )
    }

    /// Selectively drops cached entries keyed by the given division
    /// and/or season. Both absent is a no-op. Returns the number of
    /// entries removed.
    #[instrument(skip(self))]
    pub async fn invalidate_caches(
        &self,
        division_id: Option<DivisionId>,
        season_id: Option<SeasonId>,
    ) -> usize {
        if division_id.is_none() && season_id.is_none() {
            debug!("invalidate_caches called with no keys; nothing to do");
            return 0;
        }

        let mut cache = self.cache.write().await;
        let keys_to_remove: Vec<CacheKey> = cache
            .iter()
            .filter(|(key, _)| key.matches_invalidation(division_id, season_id))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys_to_remove {
            cache.pop(key);
        }
        info!(
            "Invalidated {} cache entries for division={:?} season={:?}",
            keys_to_remove.len(),
            division_id,
            season_id
        );
        keys_to_remove.len()
    }

    /// Drops every cached entry. Mutations call this since any entity
    /// change can affect all-divisions aggregates too.
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        let cache = self.cache.read().await;
        CacheStats {
            size: cache.len(),
            capacity: cache.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn should_bypass(&self, ctx: &RequestContext) -> bool {
        if ctx.user.as_ref().is_some_and(|u| u.has_any_access()) {
            debug!("Cache bypass: caller holds an access claim");
            return true;
        }
        false
    }

    async fn cached(&self, key: &CacheKey) -> Option<CachedPayload> {
        let mut cache = self.cache.write().await;
        if let Some(entry) = cache.get(key) {
            if !entry.is_expired() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit: key={key:?}, age={:?}", entry.cached_at.elapsed());
                return Some(entry.payload.clone());
            }
            warn!(
                "Removing expired cache entry: key={key:?}, age={:?}, ttl={:?}",
                entry.cached_at.elapsed(),
                entry.get_ttl()
            );
            cache.pop(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn store(&self, key: CacheKey, payload: CachedPayload) {
        let mut cache = self.cache.write().await;
        cache.put(key, CachedEntry::new(payload, self.ttl));
    }
}

impl<S: DivisionDataService + Sync> DivisionDataService for CachingDivisionService<S> {
    async fn get_division_data(
        &self,
        filter: &DivisionDataFilter,
        ctx: &RequestContext,
    ) -> Result<DivisionDataDto, AppError> {
        if self.should_bypass(ctx) {
            return self.inner.get_division_data(filter, ctx).await;
        }
        if ctx.no_cache {
            debug!("No-cache request: bypassing without repopulating");
            return self.inner.get_division_data(filter, ctx).await;
        }

        let key = CacheKey::division_data(filter);
        if let Some(CachedPayload::DivisionData(dto)) = self.cached(&key).await {
            return Ok(dto);
        }

        let dto = self.inner.get_division_data(filter, ctx).await?;
        self.store(key, CachedPayload::DivisionData(dto.clone()))
            .await;
        Ok(dto)
    }

    async fn get(
        &self,
        id: DivisionId,
        ctx: &RequestContext,
    ) -> Result<Option<DivisionDto>, AppError> {
        if self.should_bypass(ctx) || ctx.no_cache {
            return self.inner.get(id, ctx).await;
        }

        let key = CacheKey::Get { id };
        if let Some(CachedPayload::Division(dto)) = self.cached(&key).await {
            return Ok(dto);
        }

        let dto = self.inner.get(id, ctx).await?;
        self.store(key, CachedPayload::Division(dto.clone())).await;
        Ok(dto)
    }

    async fn get_all(&self, ctx: &RequestContext) -> Result<Vec<DivisionDto>, AppError> {
        if self.should_bypass(ctx) || ctx.no_cache {
            return self.inner.get_all(ctx).await;
        }

        let key = CacheKey::GetAll;
        if let Some(CachedPayload::Divisions(dtos)) = self.cached(&key).await {
            return Ok(dtos);
        }

        let dtos = self.inner.get_all(ctx).await?;
        self.store(key, CachedPayload::Divisions(dtos.clone())).await;
        Ok(dtos)
    }

    async fn get_where(
        &self,
        query: &str,
        ctx: &RequestContext,
    ) -> Result<Vec<DivisionDto>, AppError> {
        if self.should_bypass(ctx) || ctx.no_cache {
            return self.inner.get_where(query, ctx).await;
        }

        let key = CacheKey::GetWhere {
            query: query.to_string(),
        };
        if let Some(CachedPayload::Divisions(dtos)) = self.cached(&key).await {
            return Ok(dtos);
        }

        let dtos = self.inner.get_where(query, ctx).await?;
        self.store(key, CachedPayload::Divisions(dtos.clone())).await;
        Ok(dtos)
    }

    async fn upsert(
        &self,
        division: Division,
        ctx: &RequestContext,
    ) -> Result<DivisionDto, AppError> {
        let dto = self.inner.upsert(division, ctx).await?;
        info!("Upsert of division {}: clearing cache", dto.id);
        self.clear().await;
        Ok(dto)
    }

    async fn delete(
        &self,
        id: DivisionId,
        ctx: &RequestContext,
    ) -> Result<Option<DivisionDto>, AppError> {
        let dto = self.inner.delete(id, ctx).await?;
        info!("Delete of division {id}: clearing cache");
        self.clear().await;
        Ok(dto)
    }
}
