//! Metric registry and Prometheus exposition

mod prometheus;

pub use prometheus::{
    CONTENT_TYPE, ENDPOINT_LABEL, ITERATION_LABEL, PrometheusMetrics, REQUEST_DURATION_SECONDS,
    REQUESTS_TOTAL, TEMPERATURE_CELSIUS,
};

use metrics_exporter_prometheus::BuildError;

/// Error type for registry construction
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Histogram bucket layout was rejected
    #[error("Invalid histogram buckets: {0}")]
    Buckets(#[from] BuildError),
}
