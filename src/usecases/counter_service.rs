//! Counter Service - Serialized Counter Mutation and Persistence
//!
//! Owns the single `CounterState` behind one async mutex. Every read and
//! write serializes on that lock, and mutations keep holding it while
//! the snapshot is written, so:
//! - no increment is ever lost to a concurrent one
//! - two snapshot writes never overlap on the repository's tmp file
//! - a failed write is rolled back before anyone else sees the change

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{Adjustment, CounterError, CounterState, Pen, PenStats, StatsReport};
use crate::ports::clock::Clock;
use crate::ports::repository::{CounterRepository, CounterSnapshot};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request rejected by validation; nothing changed.
    #[error(transparent)]
    Counter(#[from] CounterError),

    /// Snapshot write failed; the in-memory change was rolled back.
    #[error("Failed to persist counters")]
    Persistence(anyhow::Error),
}

pub struct CounterService {
    state: Mutex<CounterState>,
    repository: Arc<dyn CounterRepository>,
    clock: Arc<dyn Clock>,
}

impl CounterService {
    /// Build the service from whatever the repository holds.
    ///
    /// A missing snapshot starts from zero. So does an unreadable one,
    /// with a warning: a corrupt file must not keep the service down.
    #[instrument(skip_all)]
    pub async fn load(repository: Arc<dyn CounterRepository>, clock: Arc<dyn Clock>) -> Self {
        let state = match repository.load().await {
            Ok(Some(snapshot)) => snapshot.into_state(),
            Ok(None) => CounterState::new(),
            Err(e) => {
                warn!(error = ?e, "Failed to load counters, starting from zero");
                CounterState::new()
            }
        };

        info!(
            total_hits = state.totals().map(|(_, v)| v).sum::<u64>(),
            "Counter service initialized"
        );

        Self::with_state(state, repository, clock)
    }

    pub fn with_state(
        state: CounterState,
        repository: Arc<dyn CounterRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Mutex::new(state),
            repository,
            clock,
        }
    }

    /// Record one click for `pen` today and persist.
    ///
    /// # Errors
    /// `UnknownItem` for a pen outside the catalogue, `Persistence` if
    /// the snapshot could not be written.
    #[instrument(skip(self))]
    pub async fn increment(&self, pen: &str) -> Result<PenStats, ServiceError> {
        let pen: Pen = pen.parse()?;
        let stats = self
            .mutate(pen, |state, today| state.increment(pen, today))
            .await?;
        debug!(pen = %pen, daily = stats.daily, total = stats.total, "Click recorded");
        Ok(stats)
    }

    /// Overwrite today's and/or the total counter for `pen` and persist.
    ///
    /// The pen is checked first, then both values, before anything is
    /// applied. Negative values clamp to zero. With neither value given
    /// nothing changes, nothing is written and `None` is returned.
    ///
    /// # Errors
    /// `UnknownItem`, `InvalidValue`, or `Persistence`.
    #[instrument(skip(self, daily, total))]
    pub async fn adjust(
        &self,
        pen: &str,
        daily: Option<&Value>,
        total: Option<&Value>,
    ) -> Result<Option<PenStats>, ServiceError> {
        let pen: Pen = pen.parse()?;
        let adjustment = Adjustment::from_json(daily, total)?;

        if adjustment.is_empty() {
            debug!(pen = %pen, "Empty adjustment ignored");
            return Ok(None);
        }

        let stats = self
            .mutate(pen, |state, today| state.adjust(pen, today, adjustment))
            .await?;
        info!(
            pen = %pen,
            daily = ?adjustment.daily,
            total = ?adjustment.total,
            "Counters adjusted"
        );
        Ok(Some(stats))
    }

    /// Today's figures for one pen.
    ///
    /// # Errors
    /// `UnknownItem` for a pen outside the catalogue.
    pub async fn snapshot(&self, pen: &str) -> Result<PenStats, CounterError> {
        let pen: Pen = pen.parse()?;
        Ok(self.state.lock().await.snapshot(pen, self.clock.today()))
    }

    /// Today's figures for every pen.
    pub async fn stats(&self) -> StatsReport {
        self.state.lock().await.report(self.clock.today())
    }

    /// Apply `change` under the lock, persist, and roll back on failure.
    async fn mutate<F>(&self, pen: Pen, change: F) -> Result<PenStats, ServiceError>
    where
        F: FnOnce(&mut CounterState, NaiveDate),
    {
        let mut state = self.state.lock().await;
        let today = self.clock.today();
        let previous = state.clone();

        change(&mut state, today);

        if let Err(e) = self.repository.save(&CounterSnapshot::from_state(&state)).await {
            *state = previous;
            error!(pen = %pen, error = ?e, "Snapshot write failed, change rolled back");
            return Err(ServiceError::Persistence(e));
        }

        Ok(state.snapshot(pen, today))
    }
}
