//! The planned windows tile the horizon exactly.

use chrono::{Datelike, Months, NaiveDate};
use journeygen::planner::plan_windows;
use proptest::prelude::*;

fn start_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Every day of [start, start + months) is covered exactly once, in order.
#[test]
fn test_windows_cover_horizon_contiguously() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(start_date(), 1u32..=24), |(start, months)| {
            let windows = plan_windows(start, months);
            let horizon_end = start.checked_add_months(Months::new(months)).unwrap();

            prop_assert_eq!(windows.first().unwrap().start, start);
            prop_assert_eq!(windows.last().unwrap().end.succ_opt().unwrap(), horizon_end);
            for pair in windows.windows(2) {
                prop_assert_eq!(pair[0].end.succ_opt().unwrap(), pair[1].start);
            }
            let covered: i64 = windows.iter().map(|w| w.days()).sum();
            prop_assert_eq!(covered, (horizon_end - start).num_days());
            Ok(())
        })
        .unwrap();
}

/// No window crosses a month boundary or the 15th/16th split.
#[test]
fn test_windows_respect_half_month_boundaries() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(start_date(), 1u32..=24), |(start, months)| {
            for window in plan_windows(start, months) {
                prop_assert!(window.start <= window.end);
                prop_assert_eq!(window.start.month(), window.end.month());
                prop_assert_eq!(window.start.year(), window.end.year());
                prop_assert_eq!(window.start.day() <= 15, window.end.day() <= 15);
            }
            Ok(())
        })
        .unwrap();
}

/// Planning is a pure function of its inputs.
#[test]
fn test_planning_is_deterministic() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(start_date(), 0u32..=24), |(start, months)| {
            prop_assert_eq!(plan_windows(start, months), plan_windows(start, months));
            Ok(())
        })
        .unwrap();
}
