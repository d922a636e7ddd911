//! HTTP API Adapter - axum Routes over the Counter Service
//!
//! Routes:
//! - `POST /click`  — `{pen}` → `{status: "ok"}`
//! - `POST /adjust` — `{pen, daily?, total?}` → `{status: "ok"}`
//! - `GET /stats`   — limits, today's date and per-pen figures
//! - `GET /pens`    — pen catalogue and limits
//! - `GET /`        — static index page
//! - `GET /metrics` — Prometheus metrics (when enabled)
//!
//! Health checks (`/live`, `/ready`) are merged in from the metrics
//! adapter.

pub mod error;
pub mod handlers;
pub mod types;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::adapters::metrics::{HealthState, MetricsRegistry, health};
use crate::usecases::CounterService;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CounterService>,
    pub metrics: Option<Arc<MetricsRegistry>>,
}

impl AppState {
    pub const fn new(service: Arc<CounterService>, metrics: Option<Arc<MetricsRegistry>>) -> Self {
        Self { service, metrics }
    }

    /// Count a rejected request and hand the error back.
    pub(crate) fn reject(&self, err: ApiError) -> ApiError {
        if let Some(metrics) = &self.metrics {
            metrics.record_error(err.kind());
            if matches!(err, ApiError::Internal { .. }) {
                metrics.persist_failures.inc();
            }
        }
        err
    }
}

/// Build the full application router.
pub fn router(state: AppState, health: HealthState) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::index))
        .route("/pens", get(handlers::pens))
        .route("/click", post(handlers::click))
        .route("/adjust", post(handlers::adjust))
        .route("/stats", get(handlers::stats));

    if state.metrics.is_some() {
        app = app.route("/metrics", get(handlers::metrics));
    }

    let app: Router = app.with_state(state);
    app.merge(health::router(health))
}
