use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tickcast_domain::value_objects::price_range::{PriceRange, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE};

/// Placeholder address of the display; operators are expected to override it.
pub const DEFAULT_TARGET_URL: &str = "http://192.168.188.107";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_INTERVAL_MS: u64 = 500;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub price: PriceConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct TargetConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_TARGET_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ScheduleConfig {
    pub interval_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u64>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            max_iterations: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct PriceConfig {
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PRICE,
            max: DEFAULT_MAX_PRICE,
            seed: None,
        }
    }
}

/// Values supplied on the command line; each one beats the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub interval_ms: Option<u64>,
    pub max_iterations: Option<u64>,
    pub seed: Option<u64>,
}

impl Config {
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = &overrides.target_url {
            self.target.url = url.clone();
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.target.timeout_ms = timeout_ms;
        }
        if let Some(interval_ms) = overrides.interval_ms {
            self.schedule.interval_ms = interval_ms;
        }
        if let Some(max_iterations) = overrides.max_iterations {
            self.schedule.max_iterations = Some(max_iterations);
        }
        if let Some(seed) = overrides.seed {
            self.price.seed = Some(seed);
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.target.url.trim().is_empty() {
            return Err("target.url must not be empty".to_string());
        }
        if self.target.timeout_ms == 0 {
            return Err("target.timeout_ms must be > 0".to_string());
        }
        self.price_range()?;
        Ok(())
    }

    pub fn price_range(&self) -> Result<PriceRange, String> {
        PriceRange::new(self.price.min, self.price.max).map_err(|err| format!("price: {err}"))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.schedule.interval_ms)
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    Ok((config, contents))
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}
