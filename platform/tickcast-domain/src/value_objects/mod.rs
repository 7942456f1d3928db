pub mod delivery;
pub mod price_range;
pub mod price_sample;
