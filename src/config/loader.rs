//! Configuration Loader - File Loading, Env Overrides and Validation
//!
//! Handles loading `config.toml`, applying `PEN_COUNTER_*` environment
//! overrides, validating the result, and providing clear error messages
//! for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PEN_COUNTER_CONFIG";
/// Overrides `persistence.data_file`.
pub const DATA_FILE_ENV: &str = "PEN_COUNTER_DATA_FILE";
/// Overrides `server.bind_address`.
pub const BIND_ENV: &str = "PEN_COUNTER_BIND";

/// Default config file location.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Load configuration using the process environment.
///
/// The file path comes from `PEN_COUNTER_CONFIG`, falling back to
/// `config.toml`.
///
/// # Errors
/// See [`load_config_with`].
pub fn load_config() -> Result<AppConfig> {
  let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
  load_config_with(&path, |key| std::env::var(key).ok())
}

/// Load and validate configuration from a TOML file plus overrides.
///
/// # Arguments
/// * `path` - Path to the config.toml file; a missing file means defaults
/// * `env` - Lookup for override variables
///
/// # Errors
/// Returns detailed error if:
/// - File exists but can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config_with<F>(path: &str, env: F) -> Result<AppConfig>
where
  F: Fn(&str) -> Option<String>,
{
  let path = Path::new(path);

  let mut config = if path.exists() {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
      .with_context(|| format!("Failed to parse {}", path.display()))?
  } else {
    AppConfig::default()
  };

  apply_env_overrides(&mut config, env);
  validate_config(&config)?;

  info!(
    bind = %config.server.bind_address,
    persistence = config.persistence.enabled,
    data_file = %config.persistence.data_file,
    "Configuration loaded successfully"
  );

  Ok(config)
}

fn apply_env_overrides<F>(config: &mut AppConfig, env: F)
where
  F: Fn(&str) -> Option<String>,
{
  if let Some(file) = env(DATA_FILE_ENV).filter(|v| !v.trim().is_empty()) {
    config.persistence.data_file = file;
  }
  if let Some(bind) = env(BIND_ENV).filter(|v| !v.trim().is_empty()) {
    config.server.bind_address = bind;
  }
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| format!("Invalid bind_address: {}", config.server.bind_address))?;

  tracing_subscriber::EnvFilter::try_new(&config.server.log_level)
    .with_context(|| format!("Invalid log_level: {}", config.server.log_level))?;

  anyhow::ensure!(
    !config.persistence.enabled || !config.persistence.data_file.trim().is_empty(),
    "persistence.data_file must not be empty when persistence is enabled"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn no_env(_: &str) -> Option<String> {
    None
  }

  #[test]
  fn test_missing_file_uses_defaults() {
    let config = load_config_with("nonexistent.toml", no_env).unwrap();
    assert_eq!(config.server.bind_address, "0.0.0.0:5000");
    assert_eq!(config.persistence.data_file, "data/pen_hits.json");
    assert!(config.persistence.enabled);
    assert!(config.metrics.enabled);
  }

  #[test]
  fn test_file_values_and_partial_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
      &path,
      "[server]\nbind_address = \"127.0.0.1:8080\"\n\n[metrics]\nenabled = false\n",
    )
    .unwrap();

    let config = load_config_with(path.to_str().unwrap(), no_env).unwrap();
    assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    assert_eq!(config.server.log_level, "info");
    assert!(!config.metrics.enabled);
    assert!(config.persistence.enabled);
  }

  #[test]
  fn test_env_overrides_data_file_and_bind() {
    let vars: HashMap<&str, &str> = [
      (DATA_FILE_ENV, "/var/lib/pens/hits.json"),
      (BIND_ENV, "127.0.0.1:9000"),
    ]
    .into_iter()
    .collect();

    let config = load_config_with("nonexistent.toml", |k| {
      vars.get(k).map(|v| (*v).to_string())
    })
    .unwrap();

    assert_eq!(config.persistence.data_file, "/var/lib/pens/hits.json");
    assert_eq!(config.server.bind_address, "127.0.0.1:9000");
  }

  #[test]
  fn test_invalid_bind_address_rejected() {
    let result = load_config_with("nonexistent.toml", |k| {
      (k == BIND_ENV).then(|| "not-an-address".to_string())
    });
    assert!(result.is_err());
  }

  #[test]
  fn test_malformed_toml_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server\n").unwrap();

    assert!(load_config_with(path.to_str().unwrap(), no_env).is_err());
  }
}
