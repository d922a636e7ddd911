//! Pen Counter — Entry Point
//!
//! Initializes configuration, logging, persistence and the HTTP API.
//! Runs until SIGINT.
//!
//! Wiring sequence:
//! 1. Load .env, then config.toml + PEN_COUNTER_* overrides + validate
//! 2. Init tracing (JSON structured logging)
//! 3. Create the repository (JSON file, or in-memory when disabled)
//! 4. Load the counter snapshot into CounterService
//! 5. Create the Prometheus registry (optional)
//! 6. Serve the API + health + metrics routes
//! 7. Wait for SIGINT → mark not-ready → drain in-flight requests → exit

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use pen_counter::adapters::api::{self, AppState};
use pen_counter::adapters::metrics::{HealthState, MetricsRegistry};
use pen_counter::adapters::persistence::{InMemoryRepository, JsonFileRepository};
use pen_counter::config;
use pen_counter::ports::clock::SystemClock;
use pen_counter::ports::repository::CounterRepository;
use pen_counter::usecases::CounterService;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Load configuration ───────────────────────────────
    let _ = dotenvy::dotenv();
    let config = config::loader::load_config().context("Failed to load configuration")?;

    // ── 2. Initialize structured JSON logging ───────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(&config.server.log_level)
                }),
        )
        .json()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.server.bind_address,
        persistence = config.persistence.enabled,
        metrics = config.metrics.enabled,
        "Starting Pen Counter"
    );

    // ── 3. Repository ───────────────────────────────────────
    let repository: Arc<dyn CounterRepository> = if config.persistence.enabled {
        info!(path = %config.persistence.data_file, "Persisting counters to JSON file");
        Arc::new(JsonFileRepository::new(&config.persistence.data_file))
    } else {
        warn!("Persistence disabled — counters are lost on restart");
        Arc::new(InMemoryRepository::new())
    };

    // ── 4. Counter service (loads snapshot) ─────────────────
    let service = Arc::new(
        CounterService::load(Arc::clone(&repository), Arc::new(SystemClock)).await,
    );

    // ── 5. Metrics registry ─────────────────────────────────
    let metrics = if config.metrics.enabled {
        Some(Arc::new(
            MetricsRegistry::new().context("Failed to create metrics registry")?,
        ))
    } else {
        None
    };

    // ── 6. Serve ────────────────────────────────────────────
    let health = HealthState::new(repository);
    let app = api::router(AppState::new(service, metrics), health.clone());

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_address))?;
    info!(address = %config.server.bind_address, "Pen Counter listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(health))
        .await
        .context("HTTP server failed")?;

    // Every mutation is already on disk; nothing left to flush.
    info!("Shutdown complete");
    Ok(())
}

/// Resolve on SIGINT, flipping readiness off first.
async fn shutdown_signal(health: HealthState) {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for SIGINT");
        std::future::pending::<()>().await;
    }
    info!("SIGINT received, initiating graceful shutdown");
    health.begin_shutdown();
}
