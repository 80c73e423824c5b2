//! Prometheus scrape handler

use axum::{extract::State, http::header, response::IntoResponse};
use infrastructure::metrics::CONTENT_TYPE;

use crate::state::AppState;

/// Current values of every metric series in the text exposition format
pub async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], state.metrics.render())
}
