//! Age- and memory-pressure-driven cache eviction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::Stats;
use crate::domain::record::now_ms;
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::memory::MemoryBudget;

/// Cleaner tunables, fixed at startup.
#[derive(Debug, Clone)]
pub struct CleanerSettings {
    /// Baseline retention window for cache entries.
    pub max_cache_age_ms: i64,
    /// How far the cutoff advances per extra pass under memory pressure.
    pub rampup_ms: i64,
}

/// Evicts stale cache entries, shortening the retention window while the
/// process is over its memory ceiling.
///
/// A pass first removes everything older than `max_cache_age_ms`. If
/// resident-memory growth still exceeds the ceiling, the cutoff ramps
/// forward by `rampup_ms` and the scan repeats, progressively trading
/// retention for memory only as long as the pressure persists.
///
/// At most one pass runs at a time process-wide; a call made while another
/// pass is running is a no-op returning 0 immediately.
pub struct CleanerService {
    store: Arc<CacheStore>,
    stats: Arc<Stats>,
    memory: Arc<MemoryBudget>,
    settings: CleanerSettings,
    running: AtomicBool,
}

impl CleanerService {
    pub fn new(
        store: Arc<CacheStore>,
        stats: Arc<Stats>,
        memory: Arc<MemoryBudget>,
        settings: CleanerSettings,
    ) -> Self {
        Self {
            store,
            stats,
            memory,
            settings,
            running: AtomicBool::new(false),
        }
    }

    /// Runs one cleaning pass and returns the number of evicted entries.
    ///
    /// Entries are re-checked against the live record at delete time, so a
    /// record refreshed between the scan and the delete survives. Scan races
    /// with concurrent resolutions are treated as data, never as faults.
    pub fn clean(&self) -> u64 {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Cache cleaner already running, skipping");
            return 0;
        }

        let started = now_ms();
        self.stats.record_cleaner_started(started);
        debug!("Cache cleaner running");

        let mut cutoff = started - self.settings.max_cache_age_ms;
        let mut cleaned: u64 = 0;

        loop {
            for key in self.store.keys() {
                if self.store.evict_if_older(&key, cutoff) {
                    cleaned += 1;
                }
            }

            if !self.memory.over_ceiling() {
                break;
            }

            // Memory pressure never subsiding must not loop forever: once
            // the store is drained or the cutoff passes the present there is
            // nothing left this cleaner could evict.
            if self.store.is_empty() || cutoff >= now_ms() {
                info!(
                    "Memory still over ceiling after draining cache ({}% of ceiling)",
                    self.memory.ratio_percent()
                );
                break;
            }

            cutoff += self.settings.rampup_ms;
            debug!("Memory over ceiling, ramping cutoff forward");
        }

        self.running.store(false, Ordering::Release);
        self.stats.record_cleaner_finished(cleaned, now_ms() - started);
        info!("Cleanup complete ({})", cleaned);

        cleaned
    }
}

/// Periodic cleaner trigger; runs one pass every `interval`.
pub async fn run_periodic_cleaner(cleaner: Arc<CleanerService>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it so startup isn't a clean.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        cleaner.clean();
    }
}

/// Memory watcher trigger; checks the ratio every `interval` and cleans
/// once it reaches `trigger_percent`.
pub async fn run_memory_watcher(
    cleaner: Arc<CleanerService>,
    memory: Arc<MemoryBudget>,
    interval: Duration,
    trigger_percent: f64,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let ratio = memory.ratio_percent();
        debug!("Memory usage: {}%", ratio);
        if ratio >= trigger_percent {
            cleaner.clean();
        }
    }
}
