//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_directives_total` (counter): directives by kind and locale
//! - `gateway_plan_duration_seconds` (histogram): planning + dispatch time
//! - `gateway_upstream_responses_total` (counter): upstream status classes

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(%error, "Failed to install metrics exporter"),
    }
}

/// Record one planned directive and the time spent serving it.
pub fn record_directive(kind: &'static str, locale: Option<&str>, start: Instant) {
    metrics::counter!(
        "gateway_directives_total",
        "kind" => kind,
        "locale" => locale.unwrap_or("none").to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_plan_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the status class of an upstream response.
pub fn record_upstream(status: u16) {
    let class = match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    };
    metrics::counter!("gateway_upstream_responses_total", "class" => class).increment(1);
}
