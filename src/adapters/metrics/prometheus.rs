//! Prometheus Metrics Registry - Counter Service Observability
//!
//! Registers click, adjustment and error counters and renders them in
//! the Prometheus text format for the `/metrics` route.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::domain::Pen;

/// Centralized Prometheus metrics for the counter service.
///
/// All metrics follow the naming convention `pen_counter_*`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Accepted clicks per pen.
    pub clicks: IntCounterVec,
    /// Accepted adjustments per pen.
    pub adjustments: IntCounterVec,
    /// Rejected requests by error kind.
    pub request_errors: IntCounterVec,
    /// Snapshot writes that failed and were rolled back.
    pub persist_failures: IntCounter,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let clicks = IntCounterVec::new(
            Opts::new("pen_counter_clicks_total", "Clicks recorded per pen"),
            &["pen"],
        )?;

        let adjustments = IntCounterVec::new(
            Opts::new(
                "pen_counter_adjustments_total",
                "Manual counter adjustments per pen",
            ),
            &["pen"],
        )?;

        let request_errors = IntCounterVec::new(
            Opts::new(
                "pen_counter_request_errors_total",
                "Requests rejected, by error kind",
            ),
            &["kind"],
        )?;

        let persist_failures = IntCounter::new(
            "pen_counter_persist_failures_total",
            "Counter snapshot writes that failed",
        )?;

        registry.register(Box::new(clicks.clone()))?;
        registry.register(Box::new(adjustments.clone()))?;
        registry.register(Box::new(request_errors.clone()))?;
        registry.register(Box::new(persist_failures.clone()))?;

        Ok(Self {
            registry,
            clicks,
            adjustments,
            request_errors,
            persist_failures,
        })
    }

    pub fn record_click(&self, pen: Pen) {
        self.clicks.with_label_values(&[pen.as_str()]).inc();
    }

    pub fn record_adjustment(&self, pen: Pen) {
        self.adjustments.with_label_values(&[pen.as_str()]).inc();
    }

    pub fn record_error(&self, kind: &str) {
        self.request_errors.with_label_values(&[kind]).inc();
    }

    /// Render every registered metric in the text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
