//! Seeded random traces for the verification binaries.
//!
//! Bounds are drawn so that both ends may sit one past the last element,
//! which exercises the clamping paths as often as the in-range ones.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::op::Trace;

/// Shape of a generated trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of elements.
    pub len: usize,
    /// Number of ops.
    pub steps: usize,
    /// Initial values are drawn from `[0, max_value]`.
    pub max_value: i32,
    /// Deltas are drawn from `[min_delta, max_delta]`.
    pub min_delta: i32,
    pub max_delta: i32,
    /// One op in `update_odds` is an update, the rest are queries.
    pub update_odds: u32,
}

impl Default for Config {
    fn default() -> Config {
        return Config {
            len: 3,
            steps: 100,
            max_value: 10,
            min_delta: 0,
            max_delta: 10,
            update_odds: 6,
        };
    }
}

/// Generate a trace from a seed.
pub fn generate(config: &Config, seed: u64) -> Trace<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    return generate_with(config, &mut rng);
}

pub fn generate_with<R: Rng>(config: &Config, rng: &mut R) -> Trace<i32> {
    let max_value = config.max_value.max(0);
    let (min_delta, max_delta) = if config.min_delta <= config.max_delta {
        (config.min_delta, config.max_delta)
    } else {
        (config.max_delta, config.min_delta)
    };
    let update_odds = config.update_odds.max(1);

    let values = (0..config.len).map(|_| rng.gen_range(0..=max_value)).collect();
    let mut trace = Trace::new(values);

    for _ in 0..config.steps {
        let left = rng.gen_range(0..=config.len);
        let right = rng.gen_range(left..=config.len);

        if rng.gen_range(0..update_odds) == 0 {
            let delta = rng.gen_range(min_delta..=max_delta);
            trace.update(left, right, delta);
        } else {
            trace.query(left, right);
        }
    }

    return trace;
}
