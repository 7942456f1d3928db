pub mod price_generator;
pub mod run_control;
