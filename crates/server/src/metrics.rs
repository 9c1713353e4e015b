//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the transcoder server:
//! - HTTP request metrics (latency, counts, in-flight)
//! - Task counts by status (collected dynamically)
//! - ffmpeg availability (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::error;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "transcoder_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("transcoder_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "transcoder_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Task Metrics (collected dynamically)
// =============================================================================

/// Tasks by current status.
pub static TASKS_BY_STATUS: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("transcoder_tasks_by_status", "Current task count by status"),
        &["status"],
    )
    .unwrap()
});

/// Whether ffmpeg resolves on the search path (1) or not (0).
pub static FFMPEG_AVAILABLE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "transcoder_ffmpeg_available",
        "Whether ffmpeg is available (1) or not (0)",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Tasks
    registry
        .register(Box::new(TASKS_BY_STATUS.clone()))
        .unwrap();
    registry
        .register(Box::new(FFMPEG_AVAILABLE.clone()))
        .unwrap();

    // Core metrics (submissions, task outcomes, ffmpeg steps)
    for metric in transcoder_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the registry at scrape time.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    for (status, count) in state.registry().count_by_status().await {
        TASKS_BY_STATUS
            .with_label_values(&[status.as_str()])
            .set(count as i64);
    }

    FFMPEG_AVAILABLE.set(if state.gateway().tool_available().await { 1 } else { 0 });
}

static ARTIFACT_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*/artifacts)/.+$").unwrap());
static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    let result = ARTIFACT_PATH.replace(path, "$1/{path}");
    let result = NUMERIC_SEGMENT.replace_all(&result, "/{id}$1");
    result.to_string()
}
