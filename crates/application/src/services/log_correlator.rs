//! Log correlator
//!
//! Emits the single structured log record of a tick. The record carries the
//! same iteration and latency the metrics of that tick were recorded with, so
//! a log line can be joined against the histogram series by its `iteration`.

use domain::entities::Tick;
use tracing::info;

/// Message of the per-tick log record
pub const TICK_MESSAGE: &str = "in progress ...";

/// Writes the per-tick log record through the `tracing` dispatcher
///
/// Emission never fails from the caller's point of view: sinks that cannot
/// keep up drop lines on their side.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCorrelator;

impl LogCorrelator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// One INFO record with `iteration` and `latency`
    pub fn emit(&self, iteration: u64, latency: f64) {
        info!(iteration, latency, "{TICK_MESSAGE}");
    }

    /// The record of `tick`
    pub fn emit_tick(&self, tick: &Tick) {
        self.emit(tick.iteration, tick.latency.seconds());
    }
}
