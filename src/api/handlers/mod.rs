//! HTTP request handlers.

pub mod clean;
pub mod resolve;
pub mod stats;
pub mod well_known;

pub use clean::clean_handler;
pub use resolve::resolve_handler;
pub use stats::stats_handler;
pub use well_known::{favicon_handler, robots_handler};
