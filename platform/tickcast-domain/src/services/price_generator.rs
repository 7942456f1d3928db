use crate::value_objects::price_range::PriceRange;
use crate::value_objects::price_sample::PriceSample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait PriceSource {
    fn next_sample(&mut self) -> PriceSample;
}

/// Independent uniform draws over a closed range, rounded to cents.
pub struct UniformPriceGenerator {
    range: PriceRange,
    rng: StdRng,
}

impl UniformPriceGenerator {
    pub fn new(range: PriceRange) -> Self {
        Self {
            range,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(range: PriceRange, seed: u64) -> Self {
        Self {
            range,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn range(&self) -> PriceRange {
        self.range
    }
}

impl PriceSource for UniformPriceGenerator {
    fn next_sample(&mut self) -> PriceSample {
        let min_cents = self.range.min_cents();
        let max_cents = self.range.max_cents();
        if max_cents <= min_cents {
            return PriceSample::from_cents(min_cents);
        }

        let raw = self.rng.gen_range(self.range.min()..=self.range.max());
        let cents = (raw * 100.0).round() as i64;
        PriceSample::from_cents(cents.clamp(min_cents, max_cents))
    }
}
