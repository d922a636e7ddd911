//! Configuration Module - TOML-based Service Configuration
//!
//! Loads optional `config.toml` with environment variable overrides
//! (including `.env` files). Pens and limits are compile-time constants
//! in the domain layer and are deliberately not configurable here.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
///
/// Every section has defaults, so a missing config file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
  /// HTTP server settings.
  #[serde(default)]
  pub server: ServerConfig,
  /// Snapshot persistence settings.
  #[serde(default)]
  pub persistence: PersistenceConfig,
  /// Metrics and monitoring.
  #[serde(default)]
  pub metrics: MetricsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  /// Listen address for the API.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
  /// Write counters to `data_file`. When false, counters live in memory only.
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// JSON snapshot path.
  #[serde(default = "default_data_file")]
  pub data_file: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
  /// Serve Prometheus metrics on `/metrics`.
  #[serde(default = "default_true")]
  pub enabled: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_address(),
      log_level: default_log_level(),
    }
  }
}

impl Default for PersistenceConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      data_file: default_data_file(),
    }
  }
}

impl Default for MetricsConfig {
  fn default() -> Self {
    Self { enabled: true }
  }
}

// Default value functions for serde

fn default_bind_address() -> String {
  "0.0.0.0:5000".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_true() -> bool {
  true
}

fn default_data_file() -> String {
  "data/pen_hits.json".to_string()
}
