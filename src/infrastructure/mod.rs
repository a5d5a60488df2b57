//! Infrastructure layer for external integrations.
//!
//! This layer provides the concrete capabilities the application services
//! consume: the concurrent record store, outbound HTTP probing, and host
//! memory readings.
//!
//! # Modules
//!
//! - [`cache`] - Concurrent in-memory record store
//! - [`http`] - HEAD probing abstractions (reqwest and test doubles)
//! - [`memory`] - Resident-memory gauge and budget accounting

pub mod cache;
pub mod http;
pub mod memory;
