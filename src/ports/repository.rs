//! Repository Port - Counter Persistence Interface
//!
//! Defines the on-disk shape of the counters and the trait that
//! persistence adapters implement. The service only ever talks to
//! `CounterRepository`, never to files or JSON directly.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{CounterState, Pen};

/// Persisted counter snapshot.
///
/// Wire format:
/// `{"total_hits": {pen: int}, "daily_hits": {pen: {"YYYY-MM-DD": int}}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
  /// Lifetime hits per pen name.
  #[serde(default)]
  pub total_hits: BTreeMap<String, u64>,
  /// Hits per pen name per ISO date.
  #[serde(default)]
  pub daily_hits: BTreeMap<String, BTreeMap<String, u64>>,
}

impl CounterSnapshot {
  /// Capture the full counter state, past days included.
  pub fn from_state(state: &CounterState) -> Self {
    let total_hits = state
      .totals()
      .map(|(pen, v)| (pen.as_str().to_string(), v))
      .collect();

    let mut daily_hits: BTreeMap<String, BTreeMap<String, u64>> = Pen::ALL
      .into_iter()
      .map(|pen| (pen.as_str().to_string(), BTreeMap::new()))
      .collect();
    for (pen, day, v) in state.daily_entries() {
      daily_hits
        .entry(pen.as_str().to_string())
        .or_default()
        .insert(day.format("%Y-%m-%d").to_string(), v);
    }

    Self {
      total_hits,
      daily_hits,
    }
  }

  /// Rebuild counter state from a snapshot.
  ///
  /// Pens missing from the snapshot start at zero. Unknown pen names
  /// and unparseable dates are skipped with a warning.
  pub fn into_state(self) -> CounterState {
    let mut state = CounterState::new();

    for (name, total) in self.total_hits {
      match name.parse::<Pen>() {
        Ok(pen) => state.set_total(pen, total),
        Err(_) => warn!(pen = %name, "Skipping total for unknown pen"),
      }
    }

    for (name, days) in self.daily_hits {
      let Ok(pen) = name.parse::<Pen>() else {
        warn!(pen = %name, "Skipping daily hits for unknown pen");
        continue;
      };
      for (date, count) in days {
        match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
          Ok(day) => state.set_daily(pen, day, count),
          Err(e) => warn!(pen = %pen, date = %date, error = %e, "Skipping malformed date key"),
        }
      }
    }

    state
  }
}

/// Trait for counter persistence providers.
///
/// `save` always receives the complete state; implementations overwrite
/// whatever was stored before.
#[async_trait]
pub trait CounterRepository: Send + Sync + 'static {
  /// Load the stored snapshot, `None` on first startup.
  async fn load(&self) -> anyhow::Result<Option<CounterSnapshot>>;

  /// Replace the stored snapshot.
  async fn save(&self, snapshot: &CounterSnapshot) -> anyhow::Result<()>;

  /// Check if the backing store is usable (permissions, disk).
  async fn is_healthy(&self) -> bool;
}
