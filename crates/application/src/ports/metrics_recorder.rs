//! Metrics recorder port
//!
//! Three process-wide series are updated on every tick:
//! - a request counter labelled by `endpoint`
//! - a request-duration histogram labelled by `iteration`
//! - a temperature gauge
//!
//! Implementations must tolerate concurrent scrapes while the loop writes.

#[cfg(test)]
use mockall::automock;

/// Port for updating the synthetic metric series
#[cfg_attr(test, automock)]
pub trait MetricsRecorder: Send + Sync {
    /// Add 1 to the request counter for `endpoint`; any label is accepted
    fn record_request(&self, endpoint: &str);

    /// Observe `value` seconds into the duration histogram under `iteration_label`
    fn record_latency(&self, iteration_label: &str, value: f64);

    /// Overwrite the temperature gauge
    fn set_temperature(&self, value: f64);
}
