//! Prometheus HTTP metrics, compiled only with the `metrics` feature.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

/// Request metrics exposed at `/metrics` under the `moodshift` namespace.
///
/// # Errors
///
/// Returns an error when the default collectors cannot be registered.
pub(crate) fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("moodshift")
        .endpoint("/metrics")
        .build()
        .map_err(|error| std::io::Error::other(format!("metrics setup failed: {error}")))
}
