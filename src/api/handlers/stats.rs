//! Handler for the service statistics endpoint.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::state::AppState;

/// Returns the current statistics snapshot.
///
/// # Endpoint
///
/// `GET /stats`
///
/// # Response
///
/// ```json
/// {
///   "cache": { "hits": 10, "misses": 4, "size": 12, "memory": 1.5 },
///   "responses": { "successful": 9, "failures": 5, "last": 1754500000000 },
///   "total_hops": 21,
///   "cleaner": { "runs": 2, "cleaned": 7, "last": 1754500000000, "lastduration": 3 }
/// }
/// ```
///
/// Counters are monotonic; `cache.size` and `cache.memory` are computed at
/// query time.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from_parts(
        state.stats.view(),
        state.store.len(),
        state.memory.ratio_percent(),
    ))
}
