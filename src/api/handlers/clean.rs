//! Handler for manually triggered cache cleaning.

use axum::extract::State;

use crate::state::AppState;

/// Runs one cache-cleaning pass and reports how many entries it evicted.
///
/// # Endpoint
///
/// `GET /clean`
///
/// # Response
///
/// The evicted count as a `text/plain` body. If a pass is already running
/// the call is a no-op and reports `0`.
pub async fn clean_handler(State(state): State<AppState>) -> String {
    state.cleaner.clean().to_string()
}
