//! Latency value object
//!
//! Simulated request latency in seconds. The emission loop draws it from
//! `[0, 1)`, but any finite non-negative value is a valid latency; values above
//! the histogram's last bucket land in the overflow bucket.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a latency is NaN, infinite or negative
#[derive(Debug, Clone, Copy, Error, PartialEq)]
#[error("invalid latency: {0} (must be finite and non-negative)")]
pub struct InvalidLatency(f64);

/// Simulated latency in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Latency(f64);

impl Latency {
    /// Zero latency
    pub const ZERO: Self = Self(0.0);

    /// Create a validated latency
    ///
    /// # Errors
    ///
    /// Returns `InvalidLatency` for NaN, infinite or negative input.
    pub fn new(seconds: f64) -> Result<Self, InvalidLatency> {
        if seconds.is_finite() && seconds >= 0.0 {
            Ok(Self(seconds))
        } else {
            Err(InvalidLatency(seconds))
        }
    }

    /// Latency in seconds
    #[must_use]
    pub const fn seconds(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl TryFrom<f64> for Latency {
    type Error = InvalidLatency;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Latency> for f64 {
    fn from(latency: Latency) -> Self {
        latency.0
    }
}

impl<'de> Deserialize<'de> for Latency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_unit_interval() {
        assert!(Latency::new(0.0).is_ok());
        assert!(Latency::new(0.37).is_ok());
        assert!(Latency::new(0.999_999).is_ok());
    }

    #[test]
    fn accepts_values_above_one() {
        assert!((Latency::new(3.5).unwrap().seconds() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(Latency::new(-0.1).is_err());
        assert!(Latency::new(f64::NAN).is_err());
        assert!(Latency::new(f64::INFINITY).is_err());
    }

    #[test]
    fn display_has_unit() {
        assert_eq!(Latency::new(0.5).unwrap().to_string(), "0.5s");
    }
}
