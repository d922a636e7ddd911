//! Counter Store - Daily and Total Pen Hits
//!
//! Pure in-memory counter state. Holds a lifetime total per pen and a
//! per-day count keyed by calendar date. Nothing here knows about locks,
//! files or HTTP: callers pass "today" in explicitly so rollover is a
//! matter of which date is asked for, not of resetting anything.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::error::{CounterError, CounterField};
use super::pen::{DAILY_LIMIT, Pen, TOTAL_LIMIT};

/// Display values for one pen on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PenStats {
    pub daily: u64,
    pub daily_remaining: u64,
    pub total: u64,
    pub total_remaining: u64,
}

/// The configured ceilings, echoed back to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limits {
    pub daily: u64,
    pub total: u64,
}

impl Limits {
    pub const CURRENT: Self = Self {
        daily: DAILY_LIMIT,
        total: TOTAL_LIMIT,
    };
}

/// Full stats payload for every pen on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub limits: Limits,
    /// ISO date (`YYYY-MM-DD`) the daily figures refer to.
    pub today: String,
    pub stats: BTreeMap<Pen, PenStats>,
}

/// Validated adjustment request. `None` leaves the counter untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Adjustment {
    pub daily: Option<u64>,
    pub total: Option<u64>,
}

impl Adjustment {
    /// Coerce raw JSON values into an adjustment.
    ///
    /// Both fields are validated before anything is returned, so a bad
    /// `total` never lets a good `daily` through on its own.
    ///
    /// # Errors
    /// `CounterError::InvalidValue` naming the first offending field.
    pub fn from_json(daily: Option<&Value>, total: Option<&Value>) -> Result<Self, CounterError> {
        Ok(Self {
            daily: daily.map_or(Ok(None), |v| coerce_count(CounterField::Daily, v))?,
            total: total.map_or(Ok(None), |v| coerce_count(CounterField::Total, v))?,
        })
    }

    pub const fn is_empty(&self) -> bool {
        self.daily.is_none() && self.total.is_none()
    }
}

/// Read a JSON value as a non-negative count.
///
/// Accepts integers, booleans (`false` = 0, `true` = 1), floats (truncated
/// toward zero) and strings holding an integer, optionally signed and with
/// single underscores between digits (`"1_000"`). Negative values clamp to
/// zero. `null` means "not provided".
///
/// # Errors
/// `CounterError::InvalidValue` for containers, non-finite floats and
/// strings that are not integers.
pub fn coerce_count(field: CounterField, value: &Value) -> Result<Option<u64>, CounterError> {
    let invalid = || CounterError::InvalidValue {
        field,
        value: value.to_string(),
    };

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(Some(u))
            } else if n.as_i64().is_some() {
                // Only negative integers miss `as_u64`.
                Ok(Some(0))
            } else {
                let f = n.as_f64().filter(|f| f.is_finite()).ok_or_else(invalid)?;
                Ok(Some(clamp_float(f)))
            }
        }
        Value::String(s) => {
            let parsed = parse_integer(s).ok_or_else(invalid)?;
            Ok(Some(clamp_wide(parsed)))
        }
        Value::Bool(b) => Ok(Some(u64::from(*b))),
        Value::Array(_) | Value::Object(_) => Err(invalid()),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_float(f: f64) -> u64 {
    let t = f.trunc();
    if t <= 0.0 {
        0
    } else {
        // `as` saturates at u64::MAX.
        t as u64
    }
}

/// Integer literal with optional sign and `_` digit separators.
/// Magnitudes beyond `i128` saturate.
fn parse_integer(s: &str) -> Option<i128> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let well_formed = !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'_')
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && !digits.contains("__");
    if !well_formed {
        return None;
    }

    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    // Only overflow can fail here.
    let magnitude = cleaned.parse::<i128>().unwrap_or(i128::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

fn clamp_wide(v: i128) -> u64 {
    u64::try_from(v.max(0)).unwrap_or(u64::MAX)
}

/// In-memory counters for every pen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    total_hits: BTreeMap<Pen, u64>,
    daily_hits: BTreeMap<Pen, BTreeMap<NaiveDate, u64>>,
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterState {
    /// Zeroed counters with an entry for every pen.
    pub fn new() -> Self {
        Self {
            total_hits: Pen::ALL.into_iter().map(|p| (p, 0)).collect(),
            daily_hits: Pen::ALL.into_iter().map(|p| (p, BTreeMap::new())).collect(),
        }
    }

    /// Record one click for `pen` on `today`.
    pub fn increment(&mut self, pen: Pen, today: NaiveDate) {
        let total = self.total_hits.entry(pen).or_insert(0);
        *total = total.saturating_add(1);

        let daily = self.daily_hits.entry(pen).or_default().entry(today).or_insert(0);
        *daily = daily.saturating_add(1);
    }

    /// Overwrite today's and/or the lifetime counter.
    pub fn adjust(&mut self, pen: Pen, today: NaiveDate, adjustment: Adjustment) {
        if let Some(daily) = adjustment.daily {
            self.set_daily(pen, today, daily);
        }
        if let Some(total) = adjustment.total {
            self.set_total(pen, total);
        }
    }

    pub fn set_total(&mut self, pen: Pen, value: u64) {
        self.total_hits.insert(pen, value);
    }

    pub fn set_daily(&mut self, pen: Pen, day: NaiveDate, value: u64) {
        self.daily_hits.entry(pen).or_default().insert(day, value);
    }

    pub fn total(&self, pen: Pen) -> u64 {
        self.total_hits.get(&pen).copied().unwrap_or(0)
    }

    pub fn daily(&self, pen: Pen, day: NaiveDate) -> u64 {
        self.daily_hits
            .get(&pen)
            .and_then(|days| days.get(&day))
            .copied()
            .unwrap_or(0)
    }

    /// Counts and remaining allowances for `pen` as of `today`.
    pub fn snapshot(&self, pen: Pen, today: NaiveDate) -> PenStats {
        let daily = self.daily(pen, today);
        let total = self.total(pen);
        PenStats {
            daily,
            daily_remaining: DAILY_LIMIT.saturating_sub(daily),
            total,
            total_remaining: TOTAL_LIMIT.saturating_sub(total),
        }
    }

    /// Stats for every pen as of `today`.
    pub fn report(&self, today: NaiveDate) -> StatsReport {
        StatsReport {
            limits: Limits::CURRENT,
            today: today.format("%Y-%m-%d").to_string(),
            stats: Pen::ALL
                .into_iter()
                .map(|pen| (pen, self.snapshot(pen, today)))
                .collect(),
        }
    }

    pub fn totals(&self) -> impl Iterator<Item = (Pen, u64)> + '_ {
        self.total_hits.iter().map(|(p, v)| (*p, *v))
    }

    /// Every recorded `(pen, day, count)`, including past days.
    pub fn daily_entries(&self) -> impl Iterator<Item = (Pen, NaiveDate, u64)> + '_ {
        self.daily_hits
            .iter()
            .flat_map(|(pen, days)| days.iter().map(move |(day, v)| (*pen, *day, *v)))
    }
}
