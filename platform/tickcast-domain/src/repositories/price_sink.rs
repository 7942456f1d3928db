use crate::value_objects::delivery::DeliveryOutcome;
use crate::value_objects::price_sample::PriceSample;

pub trait PriceSink {
    /// Human-readable destination, used in log lines.
    fn target(&self) -> &str;

    fn deliver(&self, sample: &PriceSample) -> DeliveryOutcome;
}
