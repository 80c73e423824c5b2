//! Application state shared across handlers

use std::sync::Arc;

use application::LoopProgress;
use infrastructure::PrometheusMetrics;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry the emission loop writes to; rendered on every scrape
    pub metrics: Arc<PrometheusMetrics>,
    /// Tick counter of the emission loop
    pub progress: Arc<LoopProgress>,
}

impl AppState {
    pub const fn new(metrics: Arc<PrometheusMetrics>, progress: Arc<LoopProgress>) -> Self {
        Self { metrics, progress }
    }
}
