//! Clock Port - Source of "today"
//!
//! Daily counters are keyed by calendar date, so the service asks a
//! clock which day it is instead of reading the system time directly.

use chrono::{Local, NaiveDate};

pub trait Clock: Send + Sync + 'static {
  /// Current calendar date.
  fn today(&self) -> NaiveDate;
}

/// Local wall-clock date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate {
    Local::now().date_naive()
  }
}
