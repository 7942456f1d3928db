use reqwest::blocking::Client;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use tickcast_domain::repositories::price_sink::PriceSink;
use tickcast_domain::value_objects::delivery::DeliveryOutcome;
use tickcast_domain::value_objects::price_sample::PriceSample;
use url::Url;

pub const PRICE_QUERY_PARAM: &str = "stock_price";

/// Sends each sample as `GET <base_url>?stock_price=<value>`.
pub struct HttpPriceSink {
    pub base_url: String,
    pub timeout_ms: u64,
    client: Client,
}

impl HttpPriceSink {
    pub fn new(base_url: String, timeout_ms: u64) -> Result<Self, String> {
        validate_base_url(&base_url)?;
        if timeout_ms == 0 {
            return Err("http timeout must be > 0 ms".to_string());
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            base_url,
            timeout_ms,
            client,
        })
    }
}

impl PriceSink for HttpPriceSink {
    fn target(&self) -> &str {
        &self.base_url
    }

    fn deliver(&self, sample: &PriceSample) -> DeliveryOutcome {
        let span = tracing::debug_span!(
            "infra.http.deliver",
            target_url = %self.base_url,
            timeout_ms = self.timeout_ms,
            price = %sample
        );
        let _enter = span.enter();

        metrics::counter!("tickcast.infra.http.requests_total").increment(1);
        let start = Instant::now();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[(PRICE_QUERY_PARAM, sample.to_string())])
            .send();

        let outcome = match response {
            Ok(resp) => DeliveryOutcome::from_status(resp.status().as_u16()),
            Err(err) => DeliveryOutcome::TransportFailed {
                error: error_chain(&err),
            },
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        metrics::histogram!("tickcast.infra.http.call_ms", "result" => outcome.kind())
            .record(elapsed_ms as f64);
        if !outcome.is_delivered() {
            let status_label = outcome
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".to_string());
            metrics::counter!(
                "tickcast.infra.http.errors_total",
                "kind" => outcome.kind(),
                "status" => status_label
            )
            .increment(1);
        }
        tracing::debug!(elapsed_ms, outcome = %outcome, "http delivery finished");
        outcome
    }
}

fn validate_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|err| format!("invalid target url {raw:?}: {err}"))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(format!(
                "invalid target url {raw:?}: unsupported scheme {other:?} (expected http or https)"
            ))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("invalid target url {raw:?}: missing host"));
    }
    Ok(())
}

// reqwest's top-level message omits the cause ("connection refused", "dns error").
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
