//! Histogram bucket layout
//!
//! Upper bounds for a cumulative (`le`) histogram. Observations above the
//! last bound fall into the implicit `+Inf` bucket.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::HistogramBuckets;
//!
//! let buckets = HistogramBuckets::request_duration();
//! assert_eq!(buckets.len(), 20);
//! assert_eq!(buckets.upper_bound_for(0.37), Some(0.4));
//! assert_eq!(buckets.upper_bound_for(1.5), None);
//! ```

use serde::{Deserialize, Serialize};

/// Bounds are rounded to this many decimal places to keep the exposition
/// free of float noise such as `0.15000000000000002`.
const BOUND_PRECISION: f64 = 1e10;

/// Ordered, strictly increasing histogram upper bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBuckets {
    bounds: Vec<f64>,
}

impl HistogramBuckets {
    /// Twenty linear buckets from 0.05 to 1.00 seconds
    #[must_use]
    pub fn request_duration() -> Self {
        Self {
            bounds: linear_bounds(0.05, 0.05, 20),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Smallest bound `>= value`, or `None` for the `+Inf` bucket
    #[must_use]
    pub fn upper_bound_for(&self, value: f64) -> Option<f64> {
        self.bounds.iter().copied().find(|bound| value <= *bound)
    }
}

impl Default for HistogramBuckets {
    fn default() -> Self {
        Self::request_duration()
    }
}

#[allow(clippy::cast_precision_loss)]
fn linear_bounds(start: f64, width: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| (width.mul_add(i as f64, start) * BOUND_PRECISION).round() / BOUND_PRECISION)
        .collect()
}
