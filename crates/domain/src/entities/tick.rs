//! One pass of the emission loop
//!
//! A `Tick` carries the values every signal of a pass is derived from, so the
//! counter, histogram, log record and trace of the same pass stay correlated.

use serde::{Deserialize, Serialize};

use crate::value_objects::{Endpoint, Latency, Temperature};

/// The values drawn for a single loop pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Zero-based pass index, strictly increasing
    pub iteration: u64,
    /// Simulated latency, drawn from `[0, 1)`
    pub latency: Latency,
    /// Endpoint the request counter is attributed to
    pub endpoint: Endpoint,
    /// Gauge reading, drawn from `[20, 30)`
    pub temperature: Temperature,
}

impl Tick {
    #[must_use]
    pub const fn new(
        iteration: u64,
        latency: Latency,
        endpoint: Endpoint,
        temperature: Temperature,
    ) -> Self {
        Self {
            iteration,
            latency,
            endpoint,
            temperature,
        }
    }

    /// Label value for the duration histogram: the decimal iteration index
    #[must_use]
    pub fn histogram_label(&self) -> String {
        self.iteration.to_string()
    }
}
