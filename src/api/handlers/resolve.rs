//! Handler for URL resolution requests.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Resolves the URL encoded in the request path to its final destination.
///
/// # Endpoint
///
/// `GET /{url}` — fallback route; everything that is not one of the named
/// endpoints is treated as a URL to resolve, e.g.
/// `GET /http://example.com/some/path?q=1`.
///
/// # Response
///
/// The outcome status code with the outcome text as a `text/plain` body:
/// the final URL on success, or an `ERR ...` message. Upstream terminal
/// statuses (e.g. 404) are passed through as the response status.
pub async fn resolve_handler(State(state): State<AppState>, uri: Uri) -> Response {
    // The full path+query minus the leading slash is the URL to resolve;
    // nothing is percent-decoded.
    let raw = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let target = raw.strip_prefix('/').unwrap_or(raw);

    let (code, text) = state.resolver.resolve(target).await;

    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, text).into_response()
}
