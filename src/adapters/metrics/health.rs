//! Health Check Routes - Liveness and Readiness Checks
//!
//! Exposes /live and /ready for container health checks. Readiness
//! depends on the counter repository accepting writes and on the
//! process not being in graceful shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tracing::warn;

use crate::ports::repository::CounterRepository;

/// Shared health state polled by readiness checks.
#[derive(Clone)]
pub struct HealthState {
    /// Repository whose writability gates readiness.
    repository: Arc<dyn CounterRepository>,
    /// Cleared when shutdown begins so load balancers drain traffic.
    accepting: Arc<AtomicBool>,
}

impl HealthState {
    pub fn new(repository: Arc<dyn CounterRepository>) -> Self {
        Self {
            repository,
            accepting: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the service as draining; `/ready` returns 503 from now on.
    pub fn begin_shutdown(&self) {
        self.accepting.store(false, Ordering::Relaxed);
    }

    /// Check if the service is ready to take traffic.
    pub async fn is_ready(&self) -> bool {
        self.accepting.load(Ordering::Relaxed) && self.repository.is_healthy().await
    }
}

/// Build the `/live` + `/ready` router.
pub fn router(state: HealthState) -> Router {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .with_state(state)
}

/// Liveness check: always returns 200 if the process is running.
async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness check: 200 only while accepting traffic with a writable store.
async fn readiness(State(state): State<HealthState>) -> impl IntoResponse {
    if state.is_ready().await {
        (StatusCode::OK, "READY")
    } else {
        warn!("Readiness check failed");
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::InMemoryRepository;

    #[tokio::test]
    async fn test_ready_until_shutdown() {
        let state = HealthState::new(Arc::new(InMemoryRepository::new()));
        assert!(state.is_ready().await);

        state.begin_shutdown();
        assert!(!state.is_ready().await);
    }
}
