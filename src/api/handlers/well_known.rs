//! Handlers for crawler and browser housekeeping paths.

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

/// Robots policy keeping crawlers away from resolution paths.
///
/// # Endpoint
///
/// `GET /robots.txt`
pub async fn robots_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        "User-agent: *\nDisallow: /http://\n",
    )
}

/// Empty favicon so browser requests don't fall through to the resolver.
///
/// # Endpoint
///
/// `GET /favicon.ico`
pub async fn favicon_handler() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "image/x-icon")], "")
}
