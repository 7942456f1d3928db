use serde::{Serialize, Serializer};
use std::fmt;

/// A mock stock price with exactly two fractional digits.
///
/// Stored as whole cents so the wire rendering never drifts (`150.5` is
/// always sent as `150.50`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriceSample {
    cents: i64,
}

impl PriceSample {
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Rounds half away from zero to the nearest cent.
    pub fn from_value(value: f64) -> Result<Self, String> {
        if !value.is_finite() {
            return Err(format!("price must be finite, got {value}"));
        }
        let cents = (value * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return Err(format!("price out of range: {value}"));
        }
        Ok(Self {
            cents: cents as i64,
        })
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn value(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl fmt::Display for PriceSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for PriceSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}
