//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /`            - Static index page
//! - `GET /stats`       - Statistics snapshot (JSON)
//! - `GET /clean`       - Trigger a cache-cleaning pass
//! - `GET /robots.txt`  - Crawler policy
//! - `GET /favicon.ico` - Empty icon
//! - `GET /{url}`       - Fallback: resolve the raw path+query as a URL
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Catch panic** - Converts handler panics into 500 responses so one
//!   bad resolution cannot take the process down
//!
//! Paths are deliberately not normalized: the fallback route carries raw
//! URLs in which trailing slashes are significant.

use axum::Router;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeFile;

use crate::api::handlers::{
    clean_handler, favicon_handler, resolve_handler, robots_handler, stats_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/stats", get(stats_handler))
        .route("/clean", get(clean_handler))
        .route("/robots.txt", get(robots_handler))
        .route("/favicon.ico", get(favicon_handler))
        .route_service("/", ServeFile::new("static/index.html"))
        .fallback(get(resolve_handler))
        .with_state(state)
        .layer(tracing::layer())
        .layer(CatchPanicLayer::new())
}
