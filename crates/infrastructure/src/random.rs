//! Seeded PRNG adapter for [`RandomSource`]

use application::ports::RandomSource;
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;

/// Process-wide PRNG behind a mutex
///
/// A fixed seed reproduces the same sequence of draws on every run.
#[derive(Debug)]
pub struct SeededRandomSource {
    rng: Mutex<StdRng>,
}

impl SeededRandomSource {
    /// Deterministic source
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Source seeded from the operating system
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Use `seed` if given, the operating system otherwise
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                info!(seed, "Random source seeded");
                Self::from_seed(seed)
            },
            None => Self::from_os(),
        }
    }
}

impl RandomSource for SeededRandomSource {
    fn uniform(&self, min: f64, max: f64) -> f64 {
        if min.is_finite() && max.is_finite() && min < max {
            self.rng.lock().random_range(min..max)
        } else {
            min
        }
    }

    fn index(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.rng.lock().random_range(0..len)
        }
    }
}
