use std::path::PathBuf;
use tickcast_application::config::{self, Config, ConfigOverrides};
use tickcast_application::push::{run_push_loop, LoopPlan, PushSummary};
use tickcast_domain::services::price_generator::UniformPriceGenerator;
use tickcast_domain::services::run_control::RunControl;
use tickcast_infrastructure::http::HttpPriceSink;

pub struct RunOpts {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

/// Defaults, then the optional TOML file, then command-line overrides.
pub fn build_config(opts: &RunOpts) -> Result<Config, String> {
    let mut config = match opts.config_path.as_deref() {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    config.apply_overrides(&opts.overrides);
    config.validate()?;
    Ok(config)
}

pub fn run(config: &Config, control: &dyn RunControl) -> Result<PushSummary, String> {
    config.validate()?;
    let range = config.price_range()?;
    let sink = HttpPriceSink::new(config.target.url.clone(), config.target.timeout_ms)
        .map_err(|err| format!("failed to init transmitter: {err}"))?;
    let mut generator = match config.price.seed {
        Some(seed) => UniformPriceGenerator::with_seed(range, seed),
        None => UniformPriceGenerator::new(range),
    };

    tracing::info!(
        target_url = %config.target.url,
        timeout_ms = config.target.timeout_ms,
        interval_ms = config.schedule.interval_ms,
        max_iterations = ?config.schedule.max_iterations,
        price_min = range.min(),
        price_max = range.max(),
        "starting price push loop"
    );

    let plan = LoopPlan {
        interval: config.interval(),
        max_iterations: config.schedule.max_iterations,
    };
    Ok(run_push_loop(&mut generator, &sink, control, plan))
}
