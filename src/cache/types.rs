//! Cache entry and key types shared by the caching decorator.

use crate::division::dto_factory::{DivisionDataDto, DivisionDto};
use crate::models::{DivisionDataFilter, DivisionId, SeasonId};
use chrono::NaiveDate;
use std::time::{Duration, Instant};

/// Cache identity for one query shape. Built only from substantive
/// filter fields: two filters differing in display-only hints hash and
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Get {
        id: DivisionId,
    },
    GetAll,
    GetWhere {
        query: String,
    },
    DivisionData {
        division_ids: Vec<DivisionId>,
        season_id: Option<SeasonId>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        ignore_dates: bool,
        include_proposals: bool,
    },
}

impl CacheKey {
    pub fn division_data(filter: &DivisionDataFilter) -> Self {
        let mut division_ids = filter.division_ids.clone();
        division_ids.sort();
        CacheKey::DivisionData {
            division_ids,
            season_id: filter.season_id,
            date_from: filter.date_from,
            date_to: filter.date_to,
            ignore_dates: filter.ignore_dates,
            include_proposals: filter.include_proposals,
        }
    }

    /// Whether this key is affected by an explicit invalidation for the
    /// given division and/or season. Both absent matches nothing.
    pub fn matches_invalidation(
        &self,
        division_id: Option<DivisionId>,
        season_id: Option<SeasonId>,
    ) -> bool {
        match self {
            CacheKey::Get { id } => division_id == Some(*id),
            CacheKey::GetAll | CacheKey::GetWhere { .. } => false,
            CacheKey::DivisionData {
                division_ids,
                season_id: key_season,
                ..
            } => {
                let division_hit =
                    division_id.is_some_and(|d| division_ids.contains(&d));
                let season_hit = season_id.is_some_and(|s| *key_season == Some(s));
                division_hit || season_hit
            }
        }
    }

    /// Whether this key caches a plain entity lookup (`Get`/`GetAll`/
    /// `GetWhere`), as opposed to aggregated division data.
    pub fn is_entity_shape(&self) -> bool {
        matches!(
            self,
            CacheKey::Get { .. } | CacheKey::GetAll | CacheKey::GetWhere { .. }
        )
    }
}

/// The cached value for a key. Shape always corresponds to the key's
/// query shape.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    DivisionData(DivisionDataDto),
    Division(Option<DivisionDto>),
    Divisions(Vec<DivisionDto>),
}

/// A payload with its expiry bookkeeping.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub payload: CachedPayload,
    pub cached_at: Instant,
    ttl: Duration,
}

impl CachedEntry {
    pub fn new(payload: CachedPayload, ttl: Duration) -> Self {
        CachedEntry {
            payload,
            cached_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() > self.ttl
    }

    pub fn get_ttl(&self) -> Duration {
        self.ttl
    }
}

/// Snapshot of cache effectiveness for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}
