use serde::Serialize;

pub const DEFAULT_MIN_PRICE: f64 = 100.0;
pub const DEFAULT_MAX_PRICE: f64 = 200.0;

// Absorbs binary float noise when scaling bounds such as 1.1 to cents.
const CENT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Result<Self, String> {
        if !min.is_finite() || !max.is_finite() {
            return Err(format!("price range bounds must be finite (min={min}, max={max})"));
        }
        if min < 0.0 {
            return Err(format!("price range min must be >= 0 (min={min})"));
        }
        if min > max {
            return Err(format!("price range min must be <= max (min={min}, max={max})"));
        }
        let range = Self { min, max };
        if range.min_cents() > range.max_cents() {
            return Err(format!(
                "price range must contain at least one whole cent (min={min}, max={max})"
            ));
        }
        Ok(range)
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Smallest whole-cent price inside the range.
    pub fn min_cents(&self) -> i64 {
        (self.min * 100.0 - CENT_EPSILON).ceil() as i64
    }

    /// Largest whole-cent price inside the range.
    pub fn max_cents(&self) -> i64 {
        (self.max * 100.0 + CENT_EPSILON).floor() as i64
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PRICE,
            max: DEFAULT_MAX_PRICE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PriceRange;

    #[test]
    fn default_is_one_hundred_to_two_hundred() {
        let range = PriceRange::default();
        assert_eq!(range.min(), 100.0);
        assert_eq!(range.max(), 200.0);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = PriceRange::new(200.0, 100.0).expect_err("inverted");
        assert!(err.contains("min must be <= max"));
    }

    #[test]
    fn rejects_negative_and_non_finite_bounds() {
        assert!(PriceRange::new(-1.0, 10.0).is_err());
        assert!(PriceRange::new(0.0, f64::INFINITY).is_err());
        assert!(PriceRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn cent_bounds_tolerate_float_noise() {
        let range = PriceRange::new(1.1, 2.3).expect("range");
        assert_eq!(range.min_cents(), 110);
        assert_eq!(range.max_cents(), 230);
    }

    #[test]
    fn rejects_ranges_without_a_whole_cent() {
        let err = PriceRange::new(100.001, 100.009).expect_err("no cent inside");
        assert!(err.contains("whole cent"));
    }

    #[test]
    fn degenerate_range_is_allowed() {
        let range = PriceRange::new(150.0, 150.0).expect("single point");
        assert!(range.contains(150.0));
        assert!(!range.contains(150.01));
    }
}
