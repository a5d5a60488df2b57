//! HTTP server initialization and runtime setup.
//!
//! Wires the store, prober, services and background cleaner tasks together
//! and runs the Axum server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::application::services::{
    CleanerService, CleanerSettings, ResolverService, ResolverSettings, run_memory_watcher,
    run_periodic_cleaner,
};
use crate::config::Config;
use crate::domain::Stats;
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::http::ReqwestProber;
use crate::infrastructure::memory::{MemoryBudget, MemoryGauge, ProcessMemory};
use crate::routes::app_router;
use crate::state::AppState;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Cache store and stats counters
/// - Memory budget with its startup baseline
/// - Outbound HEAD prober
/// - Background cleaner timer and memory watcher
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - The HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = Arc::new(CacheStore::new());
    let stats = Arc::new(Stats::new());

    let gauge: Arc<dyn MemoryGauge> = Arc::new(ProcessMemory::new());
    let memory = Arc::new(MemoryBudget::new(gauge, config.max_memory_usage));
    tracing::info!("Memory baseline: {} bytes", memory.baseline_bytes());

    let prober = Arc::new(ReqwestProber::new()?);

    let resolver = Arc::new(ResolverService::new(
        store.clone(),
        prober,
        stats.clone(),
        ResolverSettings {
            max_hops: config.max_hops,
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            max_cache_age_ms: config.max_cache_age_ms,
            first_hop_referer: config.public_url.clone(),
        },
    ));

    let cleaner = Arc::new(CleanerService::new(
        store.clone(),
        stats.clone(),
        memory.clone(),
        CleanerSettings {
            max_cache_age_ms: config.max_cache_age_ms,
            rampup_ms: config.cache_age_rampup_ms,
        },
    ));

    tokio::spawn(run_periodic_cleaner(
        cleaner.clone(),
        Duration::from_millis(config.cleaner_interval_ms),
    ));
    tokio::spawn(run_memory_watcher(
        cleaner.clone(),
        memory.clone(),
        Duration::from_millis(config.memory_check_interval_ms),
        config.memory_trigger_percent,
    ));
    tracing::info!("Cache cleaner tasks started");

    let state = AppState {
        resolver,
        cleaner,
        store,
        stats,
        memory,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves when the process receives SIGINT.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
