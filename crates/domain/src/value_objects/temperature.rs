//! Temperature value object for the synthetic gauge

use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(f64);

impl Temperature {
    /// Lower bound (inclusive) of the simulated temperature range
    pub const MIN_CELSIUS: f64 = 20.0;

    /// Upper bound (exclusive) of the simulated temperature range
    pub const MAX_CELSIUS: f64 = 30.0;

    /// Wrap a raw Celsius reading
    #[must_use]
    pub const fn celsius(value: f64) -> Self {
        Self(value)
    }

    /// The reading in degrees Celsius
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whether the reading lies in the simulated `[20, 30)` range
    #[must_use]
    pub fn is_in_simulated_range(self) -> bool {
        (Self::MIN_CELSIUS..Self::MAX_CELSIUS).contains(&self.0)
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°C", self.0)
    }
}
