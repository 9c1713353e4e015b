//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Submissions
//! - Task outcomes
//! - Individual ffmpeg steps

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Tasks
// =============================================================================

/// Tasks accepted by the submission gateway.
pub static TASKS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("transcoder_tasks_submitted_total", "Total tasks submitted").unwrap()
});

/// Submissions rejected before a task was created.
pub static SUBMISSIONS_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "transcoder_submissions_rejected_total",
            "Total submissions rejected before a task was created",
        ),
        &["reason"], // "empty_filename", "missing_operation", "tool_unavailable", "staging"
    )
    .unwrap()
});

/// Tasks that reached a terminal state.
pub static TASKS_FINISHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "transcoder_tasks_finished_total",
            "Total tasks that reached a terminal state",
        ),
        &["result"], // "completed", "error"
    )
    .unwrap()
});

// =============================================================================
// Steps
// =============================================================================

/// Steps run, by kind and result.
pub static STEPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("transcoder_steps_total", "Total ffmpeg steps run"),
        &["kind", "result"], // result: "success", or a ConverterError kind
    )
    .unwrap()
});

/// Step duration in seconds.
pub static STEP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("transcoder_step_duration_seconds", "Duration of ffmpeg steps")
            .buckets(vec![
                0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 1800.0, 3600.0,
            ]),
        &["kind"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(TASKS_SUBMITTED.clone()),
        Box::new(SUBMISSIONS_REJECTED.clone()),
        Box::new(TASKS_FINISHED.clone()),
        Box::new(STEPS_TOTAL.clone()),
        Box::new(STEP_DURATION.clone()),
    ]
}
