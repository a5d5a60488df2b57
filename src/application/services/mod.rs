//! Business logic services for the application layer.

pub mod cleaner_service;
pub mod resolver_service;

pub use cleaner_service::{CleanerService, CleanerSettings, run_memory_watcher, run_periodic_cleaner};
pub use resolver_service::{ResolverService, ResolverSettings};
