//! Tracing and Prometheus metrics infrastructure.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Install the global metrics recorder with its own scrape listener.
///
/// Enabled only when `METRICS_ADDR` is set (e.g. `0.0.0.0:9000`); without it
/// the `metrics` macros stay no-ops.
///
/// # Errors
/// Returns an error if the address does not parse or a recorder is already
/// installed.
pub fn init_metrics() -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    let Some(raw) = std::env::var("METRICS_ADDR").ok() else {
        return Ok(false);
    };
    let addr: SocketAddr = raw.parse()?;
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    Ok(true)
}
