//! Property-Based Tests — Counter Invariants
//!
//! Uses `proptest` to check that the counter state keeps its
//! invariants across random click/adjust sequences.

use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::json;

use pen_counter::domain::counters::coerce_count;
use pen_counter::domain::{Adjustment, CounterField, CounterState, DAILY_LIMIT, Pen, TOTAL_LIMIT};
use pen_counter::ports::repository::CounterSnapshot;

fn pen_strategy() -> impl Strategy<Value = Pen> {
    prop::sample::select(Pen::ALL.to_vec())
}

fn day_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..30).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
    })
}

proptest! {
    /// N clicks on one day give daily = total = N.
    #[test]
    fn clicks_sum_into_daily_and_total(pen in pen_strategy(), n in 0u64..200) {
        let today = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        let mut state = CounterState::new();
        for _ in 0..n {
            state.increment(pen, today);
        }
        let stats = state.snapshot(pen, today);
        prop_assert_eq!(stats.daily, n);
        prop_assert_eq!(stats.total, n);
    }

    /// Remaining allowances never go negative and add back up to the limit.
    #[test]
    fn remaining_is_floored_difference(daily in 0u64..2_000, total in 0u64..20_000) {
        let today = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        let mut state = CounterState::new();
        state.adjust(Pen::Gg5, today, Adjustment { daily: Some(daily), total: Some(total) });

        let stats = state.snapshot(Pen::Gg5, today);
        prop_assert_eq!(stats.daily_remaining, DAILY_LIMIT.saturating_sub(daily));
        prop_assert_eq!(stats.total_remaining, TOTAL_LIMIT.saturating_sub(total));
        if daily <= DAILY_LIMIT {
            prop_assert_eq!(stats.daily + stats.daily_remaining, DAILY_LIMIT);
        }
    }

    /// Total equals the sum of clicks across all days; daily only sees its own day.
    #[test]
    fn total_spans_days_daily_does_not(
        clicks in prop::collection::vec((pen_strategy(), day_strategy()), 0..100),
    ) {
        let mut state = CounterState::new();
        for (pen, day) in &clicks {
            state.increment(*pen, *day);
        }
        for pen in Pen::ALL {
            let expected_total = clicks.iter().filter(|(p, _)| *p == pen).count() as u64;
            prop_assert_eq!(state.total(pen), expected_total);
            for (_, day) in &clicks {
                let expected_daily = clicks.iter().filter(|(p, d)| *p == pen && d == day).count() as u64;
                prop_assert_eq!(state.daily(pen, *day), expected_daily);
            }
        }
    }

    /// Snapshot conversion through JSON reproduces the state exactly.
    #[test]
    fn snapshot_json_preserves_state(
        clicks in prop::collection::vec((pen_strategy(), day_strategy()), 0..60),
        overrides in prop::collection::vec((pen_strategy(), 0u64..10_000), 0..4),
    ) {
        let mut state = CounterState::new();
        for (pen, day) in clicks {
            state.increment(pen, day);
        }
        for (pen, total) in overrides {
            state.set_total(pen, total);
        }

        let json = serde_json::to_string(&CounterSnapshot::from_state(&state)).unwrap();
        let back: CounterSnapshot = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.into_state(), state);
    }

    /// Negative integers clamp to zero for both fields alike.
    #[test]
    fn negative_values_clamp_for_both_fields(v in i64::MIN..0) {
        prop_assert_eq!(coerce_count(CounterField::Daily, &json!(v)).unwrap(), Some(0));
        prop_assert_eq!(coerce_count(CounterField::Total, &json!(v)).unwrap(), Some(0));
        prop_assert_eq!(coerce_count(CounterField::Total, &json!(v.to_string())).unwrap(), Some(0));
    }

    /// Non-negative integers pass through unchanged, as numbers or strings.
    #[test]
    fn non_negative_values_pass_through(v in 0u64..u64::MAX) {
        prop_assert_eq!(coerce_count(CounterField::Daily, &json!(v)).unwrap(), Some(v));
        prop_assert_eq!(coerce_count(CounterField::Daily, &json!(v.to_string())).unwrap(), Some(v));
    }
}
