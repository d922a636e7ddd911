//! In-memory `CounterRepository`, used when file persistence is disabled.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::repository::{CounterRepository, CounterSnapshot};

/// Keeps the last saved snapshot for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    snapshot: RwLock<Option<CounterSnapshot>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository as if a previous run had saved `snapshot`.
    pub fn with_snapshot(snapshot: CounterSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }
}

#[async_trait]
impl CounterRepository for InMemoryRepository {
    async fn load(&self) -> Result<Option<CounterSnapshot>> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, snapshot: &CounterSnapshot) -> Result<()> {
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
