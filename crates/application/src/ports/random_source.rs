//! Random source port
//!
//! Bounded-range pseudo-random numbers for the emission loop. There is no
//! cryptographic requirement; adapters are free to use a seeded PRNG.

#[cfg(test)]
use mockall::automock;

/// Port for drawing uniformly distributed values
#[cfg_attr(test, automock)]
pub trait RandomSource: Send + Sync {
    /// A value in `[min, max)`; returns `min` when the range is empty
    fn uniform(&self, min: f64, max: f64) -> f64;

    /// An index in `[0, len)`; returns 0 when `len` is 0
    fn index(&self, len: usize) -> usize;
}
