#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;
use url_resolver::prelude::*;

pub const MAX_CACHE_AGE_MS: i64 = 7 * 24 * 3600 * 1000;

/// Prober serving canned responses keyed by exact URL, no network involved.
pub struct ScriptedProber {
    responses: HashMap<String, ProbeResponse>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    /// Scripts a redirect from `url` to `location`.
    pub fn redirect(mut self, url: &str, location: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            ProbeResponse {
                status: 301,
                location: Some(location.to_string()),
            },
        );
        self
    }

    /// Scripts a terminal status for `url`.
    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(
            url.to_string(),
            ProbeResponse {
                status,
                location: None,
            },
        );
        self
    }
}

#[async_trait]
impl HttpProber for ScriptedProber {
    async fn head(&self, target: &Url, _referer: &str) -> Result<ProbeResponse, ProbeError> {
        self.responses
            .get(target.as_str())
            .cloned()
            .ok_or_else(|| ProbeError::Transport(format!("connection refused to {target}")))
    }
}

/// Gauge pinned to a constant reading, keeping memory pressure at zero.
pub struct FixedGauge(pub u64);

impl MemoryGauge for FixedGauge {
    fn resident_bytes(&self) -> u64 {
        self.0
    }
}

pub fn create_test_state(prober: Arc<dyn HttpProber>) -> AppState {
    let store = Arc::new(CacheStore::new());
    let stats = Arc::new(Stats::new());
    let memory = Arc::new(MemoryBudget::new(Arc::new(FixedGauge(0)), u64::MAX));

    let resolver = Arc::new(ResolverService::new(
        store.clone(),
        prober,
        stats.clone(),
        ResolverSettings {
            max_hops: 10,
            request_timeout: Duration::from_millis(1_000),
            max_cache_age_ms: MAX_CACHE_AGE_MS,
            first_hop_referer: "http://resolver.test/".to_string(),
        },
    ));

    let cleaner = Arc::new(CleanerService::new(
        store.clone(),
        stats.clone(),
        memory.clone(),
        CleanerSettings {
            max_cache_age_ms: MAX_CACHE_AGE_MS,
            rampup_ms: 24 * 3600 * 1000,
        },
    ));

    AppState {
        resolver,
        cleaner,
        store,
        stats,
        memory,
    }
}
