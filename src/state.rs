use std::sync::Arc;

use crate::application::services::{CleanerService, ResolverService};
use crate::domain::Stats;
use crate::infrastructure::cache::CacheStore;
use crate::infrastructure::memory::MemoryBudget;

/// Shared application state injected into all handlers.
///
/// Everything is behind an `Arc`: the store, counters and services are the
/// single shared instances mutated by concurrent resolutions and the
/// cleaner tasks.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ResolverService>,
    pub cleaner: Arc<CleanerService>,
    pub store: Arc<CacheStore>,
    pub stats: Arc<Stats>,
    pub memory: Arc<MemoryBudget>,
}
