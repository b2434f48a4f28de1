use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{NetError, Result};

/// Uniform real draws over `[lower, upper)` used for weight initialization.
///
/// `new` seeds from OS entropy; `seeded` gives a reproducible stream so tests
/// can pin the exact initial weights.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    dist: Uniform<f64>,
}

impl RandomSource {
    pub fn new(lower: f64, upper: f64) -> Result<RandomSource> {
        Ok(RandomSource {
            rng: StdRng::from_entropy(),
            dist: Self::uniform(lower, upper)?,
        })
    }

    pub fn seeded(lower: f64, upper: f64, seed: u64) -> Result<RandomSource> {
        Ok(RandomSource {
            rng: StdRng::seed_from_u64(seed),
            dist: Self::uniform(lower, upper)?,
        })
    }

    /// Seeded when `seed` is `Some`, entropy-backed otherwise.
    pub fn from_seed(lower: f64, upper: f64, seed: Option<u64>) -> Result<RandomSource> {
        match seed {
            Some(seed) => Self::seeded(lower, upper, seed),
            None => Self::new(lower, upper),
        }
    }

    /// One independent draw from `[lower, upper)`.
    pub fn draw(&mut self) -> f64 {
        self.dist.sample(&mut self.rng)
    }

    fn uniform(lower: f64, upper: f64) -> Result<Uniform<f64>> {
        // Uniform::new panics on an empty or non-finite range.
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(NetError::InvalidConfig(format!(
                "random bounds must satisfy lower < upper, got [{lower}, {upper})"
            )));
        }
        Ok(Uniform::new(lower, upper))
    }
}
