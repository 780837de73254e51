//! Application-wide constants and configuration values
//!
//! This module centralizes magic numbers and configuration constants
//! so the aggregation engine and cache layer stay configurable.

#![allow(dead_code)]

/// Placeholder division name used in sentinel results when no specific
/// division was requested.
pub const ALL_DIVISIONS_PLACEHOLDER: &str = "<all divisions>";

/// Cache TTL (Time To Live) values in seconds
pub mod cache_ttl {
    /// TTL for aggregated division data (5 minutes). Division data only
    /// changes on result submission, so a short TTL keeps anonymous
    /// traffic cheap without serving stale tables for long.
    pub const DIVISION_DATA_SECONDS: u64 = 300;

    /// TTL for cached entity lookups (1 hour). Divisions are renamed or
    /// deleted rarely, and mutations invalidate eagerly anyway.
    pub const ENTITY_SECONDS: u64 = 3600;
}

/// Cache sizing defaults
pub mod cache {
    /// Default number of entries the division cache can hold
    pub const DEFAULT_CAPACITY: usize = 100;
}

/// League table scoring
pub mod ranking {
    /// Points awarded per league fixture won
    pub const POINTS_PER_WIN: u32 = 2;

    /// Points awarded per league fixture drawn
    pub const POINTS_PER_DRAW: u32 = 1;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "DARTS_DIVISION_LOG_FILE";

    /// Environment variable for division data cache TTL override (seconds)
    pub const CACHE_TTL: &str = "DARTS_DIVISION_CACHE_TTL";

    /// Environment variable for cache capacity override
    pub const CACHE_CAPACITY: &str = "DARTS_DIVISION_CACHE_CAPACITY";
}
