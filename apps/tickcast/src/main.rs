use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tickcast::shutdown::{install_signal_handler, ShutdownControl};
use tickcast::{build_config, RunOpts};
use tickcast_application::config::{to_toml_pretty, ConfigOverrides};

#[derive(Parser, Debug)]
#[command(name = "tickcast")]
#[command(about = "Push synthetic stock prices to an HTTP display endpoint.", version)]
struct Cli {
    /// Config file path (TOML). Optional; built-in defaults apply otherwise.
    #[arg(long, env = "TICKCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Destination base URL (e.g. http://192.168.188.107).
    #[arg(long, env = "TICKCAST_TARGET")]
    target: Option<String>,

    /// Pause between iterations in milliseconds (default: 500).
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Per-request timeout in milliseconds (default: 5000).
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Stop after this many iterations instead of running until interrupted.
    #[arg(long)]
    iterations: Option<u64>,

    /// Seed the price generator for a reproducible sequence.
    #[arg(long)]
    seed: Option<u64>,

    /// Prometheus metrics listen addr (e.g. 127.0.0.1:9898). Optional.
    #[arg(long, env = "TICKCAST_METRICS_ADDR")]
    metrics_addr: Option<String>,

    /// Print the effective config as TOML and exit.
    #[arg(long, default_value_t = false)]
    print_config: bool,

    /// Print a single JSON summary line on exit.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let opts = RunOpts {
        config_path: cli.config,
        overrides: ConfigOverrides {
            target_url: cli.target,
            timeout_ms: cli.timeout_ms,
            interval_ms: cli.interval_ms,
            max_iterations: cli.iterations,
            seed: cli.seed,
        },
    };
    let config = match build_config(&opts) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if cli.print_config {
        match to_toml_pretty(&config) {
            Ok(rendered) => {
                print!("{rendered}");
                std::process::exit(0);
            }
            Err(err) => {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
    }

    if let Err(err) = init_tracing() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = init_metrics(cli.metrics_addr.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let control = ShutdownControl::new();
    if let Err(err) = install_signal_handler(control.clone()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let summary = match tickcast::run(&config, &control) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string(&summary)
                .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"json\"}".to_string())
        );
    }
}

fn init_tracing() -> Result<(), String> {
    let filter = std::env::var("TICKCAST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

#[cfg(feature = "prometheus")]
fn init_metrics(metrics_addr: Option<&str>) -> Result<Option<SocketAddr>, String> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let Some(raw) = metrics_addr else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let addr: SocketAddr = raw
        .parse()
        .map_err(|err| format!("invalid --metrics-addr (expected host:port): {err}"))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("failed to install prometheus exporter: {err}"))?;

    tracing::info!(metrics_addr = %addr, "prometheus metrics exporter enabled");
    Ok(Some(addr))
}

#[cfg(not(feature = "prometheus"))]
fn init_metrics(metrics_addr: Option<&str>) -> Result<Option<SocketAddr>, String> {
    if metrics_addr.is_some_and(|raw| !raw.trim().is_empty()) {
        return Err("metrics exporter requires tickcast feature `prometheus`".to_string());
    }
    Ok(None)
}
