//! Application layer services implementing the resolution business logic.
//!
//! This layer orchestrates the domain model over the infrastructure
//! capabilities: the resolver walks redirect chains through the prober and
//! the cache store; the cleaner enforces retention against the memory
//! budget. Services expose a small API consumed by the HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::resolver_service::ResolverService`] - Redirect-chain resolution
//! - [`services::cleaner_service::CleanerService`] - Adaptive cache eviction

pub mod services;
