//! Process-wide counters updated by the resolver and the cache cleaner.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Monotonic service counters.
///
/// Counters are initialized to zero at process start and only ever move
/// forward; there is no reset short of a restart. Each field is updated with
/// a single atomic operation, so concurrent resolutions and the cleaner can
/// record without any shared lock.
#[derive(Debug, Default)]
pub struct Stats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    responses_successful: AtomicU64,
    responses_failures: AtomicU64,
    responses_last_ms: AtomicI64,
    total_hops: AtomicU64,
    cleaner_runs: AtomicU64,
    cleaner_cleaned: AtomicU64,
    cleaner_last_ms: AtomicI64,
    cleaner_last_duration_ms: AtomicI64,
}

/// Plain-value copy of [`Stats`] taken at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub responses_successful: u64,
    pub responses_failures: u64,
    pub responses_last_ms: i64,
    pub total_hops: u64,
    pub cleaner_runs: u64,
    pub cleaner_cleaned: u64,
    pub cleaner_last_ms: i64,
    pub cleaner_last_duration_ms: i64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one issued probe. Cache hits never count a hop.
    pub fn record_hop(&self) {
        self.total_hops.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a finished resolution, successful (200) or not.
    pub fn record_response(&self, code: u16, now_ms: i64) {
        if code == 200 {
            self.responses_successful.fetch_add(1, Ordering::Relaxed);
        } else {
            self.responses_failures.fetch_add(1, Ordering::Relaxed);
        }
        self.responses_last_ms.store(now_ms, Ordering::Relaxed);
    }

    /// Marks the start of a cleaner pass.
    pub fn record_cleaner_started(&self, now_ms: i64) {
        self.cleaner_runs.fetch_add(1, Ordering::Relaxed);
        self.cleaner_last_ms.store(now_ms, Ordering::Relaxed);
    }

    /// Accumulates the result of a finished cleaner pass.
    pub fn record_cleaner_finished(&self, cleaned: u64, duration_ms: i64) {
        self.cleaner_cleaned.fetch_add(cleaned, Ordering::Relaxed);
        self.cleaner_last_duration_ms
            .store(duration_ms, Ordering::Relaxed);
    }

    pub fn view(&self) -> StatsView {
        StatsView {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            responses_successful: self.responses_successful.load(Ordering::Relaxed),
            responses_failures: self.responses_failures.load(Ordering::Relaxed),
            responses_last_ms: self.responses_last_ms.load(Ordering::Relaxed),
            total_hops: self.total_hops.load(Ordering::Relaxed),
            cleaner_runs: self.cleaner_runs.load(Ordering::Relaxed),
            cleaner_cleaned: self.cleaner_cleaned.load(Ordering::Relaxed),
            cleaner_last_ms: self.cleaner_last_ms.load(Ordering::Relaxed),
            cleaner_last_duration_ms: self.cleaner_last_duration_ms.load(Ordering::Relaxed),
        }
    }
}
