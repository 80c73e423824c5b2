//! Property-based tests for the seeded random source

use application::ports::RandomSource;
use domain::value_objects::{Latency, Temperature};
use infrastructure::SeededRandomSource;
use proptest::prelude::*;

proptest! {
    #[test]
    fn latency_draws_stay_in_unit_interval(seed in any::<u64>()) {
        let random = SeededRandomSource::from_seed(seed);
        for _ in 0..200 {
            let value = random.uniform(0.0, 1.0);
            prop_assert!((0.0..1.0).contains(&value), "drew {}", value);
            prop_assert!(Latency::new(value).is_ok());
        }
    }

    #[test]
    fn temperature_draws_stay_in_simulated_range(seed in any::<u64>()) {
        let random = SeededRandomSource::from_seed(seed);
        for _ in 0..200 {
            let value = random.uniform(Temperature::MIN_CELSIUS, Temperature::MAX_CELSIUS);
            prop_assert!(Temperature::celsius(value).is_in_simulated_range());
        }
    }

    #[test]
    fn index_draws_stay_below_len(seed in any::<u64>(), len in 1usize..64) {
        let random = SeededRandomSource::from_seed(seed);
        for _ in 0..100 {
            prop_assert!(random.index(len) < len);
        }
    }

    #[test]
    fn uniform_respects_arbitrary_bounds(
        seed in any::<u64>(),
        min in -1e6f64..1e6,
        width in 1e-3f64..1e6,
    ) {
        let random = SeededRandomSource::from_seed(seed);
        let max = min + width;
        let value = random.uniform(min, max);
        prop_assert!(value >= min && value < max);
    }
}
