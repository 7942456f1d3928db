pub mod runner;
pub mod shutdown;

pub use runner::{build_config, run, RunOpts};
pub use shutdown::ShutdownControl;
