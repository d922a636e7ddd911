//! JSON File Repository - Atomic Counter Snapshot Persistence
//!
//! Saves the counter snapshot to a single JSON file using atomic writes
//! (write to tmp file, sync, then rename). The target file is always
//! either the old or the new version, never a partial write.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::ports::repository::{CounterRepository, CounterSnapshot};

/// File-backed `CounterRepository`.
///
/// Callers must not run two `save`s concurrently; the temporary path is
/// shared. `CounterService` guarantees this by holding its lock across
/// the write.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    /// Path to the snapshot file.
    path: PathBuf,
    /// Sibling path used for atomic writes.
    tmp_path: PathBuf,
    /// Where an unparseable snapshot is moved before it can be overwritten.
    corrupt_path: PathBuf,
}

impl JsonFileRepository {
    /// Create a repository writing to `path`. No I/O happens until the
    /// first `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            tmp_path: sibling(&path, ".tmp"),
            corrupt_path: sibling(&path, ".corrupt"),
            path,
        }
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        }
        Ok(())
    }

    /// Move an unparseable snapshot to `<path>.corrupt` so the next save
    /// cannot destroy it. Replaces any older `.corrupt` file.
    async fn quarantine(&self) -> Result<()> {
        fs::rename(&self.path, &self.corrupt_path)
            .await
            .with_context(|| format!("Failed to move corrupt counter file to {}", self.corrupt_path.display()))
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[async_trait]
impl CounterRepository for JsonFileRepository {
    /// Load the snapshot file.
    ///
    /// Returns `None` if no file exists (first startup). A file that
    /// exists but cannot be read or parsed is an error; the caller
    /// decides whether that is fatal. An unparseable file is first moved
    /// to `<path>.corrupt`.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<CounterSnapshot>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            info!("No counter file found, starting fresh");
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .await
            .context("Failed to read counter file")?;

        let snapshot: CounterSnapshot = match serde_json::from_str(&json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                match self.quarantine().await {
                    Ok(()) => warn!(
                        corrupt_path = %self.corrupt_path.display(),
                        error = %e,
                        "Unparseable counter file moved aside"
                    ),
                    Err(move_err) => warn!(error = ?move_err, "Could not move unparseable counter file"),
                }
                return Err(e).context("Failed to parse counter JSON");
            }
        };

        info!(
            pens = snapshot.total_hits.len(),
            "Counter snapshot loaded"
        );

        Ok(Some(snapshot))
    }

    /// Save the snapshot atomically (tmp → fsync → rename).
    #[instrument(skip(self, snapshot), fields(path = %self.path.display()))]
    async fn save(&self, snapshot: &CounterSnapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)
            .context("Failed to serialize counters")?;

        self.ensure_parent_dir().await?;

        let mut file = fs::File::create(&self.tmp_path)
            .await
            .context("Failed to create tmp counter file")?;
        file.write_all(&json)
            .await
            .context("Failed to write tmp counter file")?;
        file.sync_all()
            .await
            .context("Failed to sync tmp counter file")?;
        drop(file);

        // Atomic rename
        fs::rename(&self.tmp_path, &self.path)
            .await
            .context("Failed to rename counter file")?;

        debug!(bytes = json.len(), "Counter snapshot saved");

        Ok(())
    }

    /// Healthy when the data directory accepts writes.
    async fn is_healthy(&self) -> bool {
        if self.ensure_parent_dir().await.is_err() {
            return false;
        }
        let marker = self.path.with_extension("health_check");
        let result = fs::write(&marker, b"ok").await;
        let _ = fs::remove_file(&marker).await;
        result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{CounterState, Pen};

    fn sample_state() -> CounterState {
        let day = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let mut state = CounterState::new();
        state.increment(Pen::Gg5, day);
        state.increment(Pen::Gg5, day);
        state.set_total(Pen::CrystalOg, 12);
        state
    }

    #[tokio::test]
    async fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("hits.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested/hits.json"));
        let state = sample_state();

        repo.save(&CounterSnapshot::from_state(&state)).await.unwrap();
        let loaded = repo.load().await.unwrap().unwrap();

        assert_eq!(loaded.into_state(), state);
        assert!(!dir.path().join("nested/hits.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("hits.json"));

        repo.save(&CounterSnapshot::from_state(&sample_state())).await.unwrap();
        repo.save(&CounterSnapshot::from_state(&CounterState::new())).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded.into_state(), CounterState::new());
    }

    #[tokio::test]
    async fn test_load_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hits.json");
        std::fs::write(&path, "{ not json").unwrap();

        let repo = JsonFileRepository::new(&path);
        assert!(repo.load().await.is_err());
        assert!(!path.exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hits.json.corrupt")).unwrap(),
            "{ not json"
        );
    }

    #[tokio::test]
    async fn test_out_of_range_count_moves_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hits.json");
        let original = r#"{"total_hits": {"GG5": 7, "Crystal OG": -1}, "daily_hits": {}}"#;
        std::fs::write(&path, original).unwrap();

        let repo = JsonFileRepository::new(&path);
        assert!(repo.load().await.is_err());

        // Later saves land on the original path and leave the copy alone.
        repo.save(&CounterSnapshot::from_state(&CounterState::new())).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hits.json.corrupt")).unwrap(),
            original
        );
        assert!(repo.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_is_healthy_in_writable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("hits.json"));
        assert!(repo.is_healthy().await);
        assert!(!dir.path().join("hits.health_check").exists());
    }
}
