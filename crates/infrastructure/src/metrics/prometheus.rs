//! Prometheus-backed metric series
//!
//! The registry is an explicitly owned [`PrometheusRecorder`]; it is never
//! installed as the global `metrics` recorder. Every update is routed to it
//! with `metrics::with_local_recorder`, and the scrape handler renders it
//! through the recorder's handle.

use domain::value_objects::HistogramBuckets;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tracing::debug;

use application::ports::MetricsRecorder;

use super::MetricsError;

// Metric name constants
pub const REQUESTS_TOTAL: &str = "test_requests_total";
pub const TEMPERATURE_CELSIUS: &str = "test_temperature_celsius";
pub const REQUEST_DURATION_SECONDS: &str = "xxx_http_request_duration_seconds";

/// Label of [`REQUESTS_TOTAL`]
pub const ENDPOINT_LABEL: &str = "endpoint";
/// Label of [`REQUEST_DURATION_SECONDS`]
pub const ITERATION_LABEL: &str = "iteration";

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// The process's metric registry
pub struct PrometheusMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

impl PrometheusMetrics {
    /// Registry with the request-duration histogram on `buckets`
    pub fn new(buckets: &HistogramBuckets) -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
                buckets.bounds(),
            )?
            .build_recorder();
        let handle = recorder.handle();

        let metrics = Self { recorder, handle };
        metrics.register_descriptions();
        debug!(buckets = buckets.len(), "Prometheus registry created");
        Ok(metrics)
    }

    /// Registry with the default 0.05..=1.0 duration buckets
    pub fn with_default_buckets() -> Result<Self, MetricsError> {
        Self::new(&HistogramBuckets::request_duration())
    }

    /// Text exposition of every series
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }

    fn register_descriptions(&self) {
        metrics::with_local_recorder(&self.recorder, || {
            describe_counter!(REQUESTS_TOTAL, "Total number of simulated requests by endpoint");
            describe_gauge!(TEMPERATURE_CELSIUS, "Simulated temperature in degrees Celsius");
            describe_histogram!(
                REQUEST_DURATION_SECONDS,
                "Simulated request duration in seconds by iteration"
            );
        });
    }
}

impl MetricsRecorder for PrometheusMetrics {
    fn record_request(&self, endpoint: &str) {
        metrics::with_local_recorder(&self.recorder, || {
            counter!(REQUESTS_TOTAL, ENDPOINT_LABEL => endpoint.to_string()).increment(1);
        });
    }

    fn record_latency(&self, iteration_label: &str, value: f64) {
        metrics::with_local_recorder(&self.recorder, || {
            histogram!(REQUEST_DURATION_SECONDS, ITERATION_LABEL => iteration_label.to_string())
                .record(value);
        });
    }

    fn set_temperature(&self, value: f64) {
        metrics::with_local_recorder(&self.recorder, || {
            gauge!(TEMPERATURE_CELSIUS).set(value);
        });
    }
}
