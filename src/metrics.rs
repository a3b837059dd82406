//! Prometheus metrics helpers.
//!
//! Thin wrappers so handlers record observations with one call instead of
//! repeating label plumbing at every site.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder (once per process) and return the render
/// handle for the /metrics endpoint. Safe to call from every router build —
/// subsequent calls reuse the first handle.
pub fn install() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .expect("Failed to install Prometheus recorder")
        })
        .clone()
}

/// Count a finished request by endpoint and status code.
pub fn record_request(endpoint: &'static str, status: u16) {
    counter!(
        "lull_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record wall-clock duration for an endpoint.
pub fn record_duration(endpoint: &'static str, start: Instant) {
    histogram!("lull_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Count a failed call to the upstream platform.
pub fn record_upstream_error(source: &'static str) {
    counter!("lull_upstream_errors_total", "source" => source).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_idempotent() {
        let first = install();
        let second = install();
        // Both handles render from the same recorder.
        record_request("test", 200);
        assert!(first.render().contains("lull_requests_total"));
        assert!(second.render().contains("lull_requests_total"));
    }
}
