// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the NIOS provider.
//!
//! All metrics use the namespace prefix `nios_provider_`.
//!
//! # Metrics Categories
//!
//! - **Operation Metrics** - Count lifecycle operations by outcome
//! - **Performance Metrics** - Track operation duration, remote call included
//!
//! # Example
//!
//! ```rust,no_run
//! use nios_provider::errors::Operation;
//! use nios_provider::metrics::{record_operation, OperationOutcome};
//!
//! let elapsed = std::time::Duration::from_millis(40);
//! record_operation(Operation::Create, OperationOutcome::Success, elapsed);
//! ```

use crate::constants::METRICS_NAMESPACE;
use crate::errors::{ControllerError, Operation};
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Operation Metrics
// ============================================================================

/// Total number of lifecycle operations by operation and outcome
///
/// Labels:
/// - `operation`: `create`, `read`, `update`, `delete`, `import` or `list`
/// - `outcome`: see [`OperationOutcome`]
pub static OPERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_operations_total"),
        "Total number of A record operations by operation and outcome",
    );
    let counter = CounterVec::new(opts, &["operation", "outcome"])
        .expect("operations_total metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect("operations_total is registered once");
    counter
});

// ============================================================================
// Performance Metrics
// ============================================================================

/// Duration of lifecycle operations in seconds
///
/// Labels:
/// - `operation`: lifecycle operation
pub static OPERATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_operation_duration_seconds"),
        "Duration of A record operations in seconds by operation",
    )
    .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["operation"])
        .expect("operation_duration_seconds metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("operation_duration_seconds is registered once");
    histogram
});

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Completed and the object exists
    Success,
    /// Completed and found nothing (read of a deleted record, delete of a missing one)
    Absent,
    /// Rejected before any remote call
    ValidationError,
    /// The remote call failed or answered something unusable
    RemoteError,
}

impl OperationOutcome {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationOutcome::Success => "success",
            OperationOutcome::Absent => "absent",
            OperationOutcome::ValidationError => "validation_error",
            OperationOutcome::RemoteError => "remote_error",
        }
    }

    /// Outcome label for a failed operation.
    #[must_use]
    pub fn for_error(error: &ControllerError) -> Self {
        if error.is_validation() {
            OperationOutcome::ValidationError
        } else {
            OperationOutcome::RemoteError
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Record one finished operation
///
/// # Arguments
/// * `operation` - The lifecycle operation
/// * `outcome` - How it ended
/// * `duration` - Wall time of the operation
pub fn record_operation(operation: Operation, outcome: OperationOutcome, duration: Duration) {
    OPERATIONS_TOTAL
        .with_label_values(&[operation.as_str(), outcome.as_str()])
        .inc();
    OPERATION_DURATION_SECONDS
        .with_label_values(&[operation.as_str()])
        .observe(duration.as_secs_f64());
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
