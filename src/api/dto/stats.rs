//! DTOs for the service statistics endpoint.

use serde::Serialize;

use crate::domain::StatsView;

/// Full statistics snapshot returned by `GET /stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStats,
    pub responses: ResponseStats,
    pub total_hops: u64,
    pub cleaner: CleanerStats,
}

#[derive(Debug, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Live key count, computed per query.
    pub size: usize,
    /// Percent of the memory ceiling consumed by growth since startup.
    pub memory: f64,
}

#[derive(Debug, Serialize)]
pub struct ResponseStats {
    pub successful: u64,
    pub failures: u64,
    /// Milliseconds since epoch of the most recent resolution.
    pub last: i64,
}

#[derive(Debug, Serialize)]
pub struct CleanerStats {
    pub runs: u64,
    pub cleaned: u64,
    pub last: i64,
    pub lastduration: i64,
}

impl StatsResponse {
    /// Combines the counter snapshot with the on-demand computed figures.
    pub fn from_parts(view: StatsView, cache_size: usize, memory_percent: f64) -> Self {
        Self {
            cache: CacheStats {
                hits: view.cache_hits,
                misses: view.cache_misses,
                size: cache_size,
                memory: memory_percent,
            },
            responses: ResponseStats {
                successful: view.responses_successful,
                failures: view.responses_failures,
                last: view.responses_last_ms,
            },
            total_hops: view.total_hops,
            cleaner: CleanerStats {
                runs: view.cleaner_runs,
                cleaned: view.cleaner_cleaned,
                last: view.cleaner_last_ms,
                lastduration: view.cleaner_last_duration_ms,
            },
        }
    }
}
