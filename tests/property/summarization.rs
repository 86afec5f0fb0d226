//! Digest derivation is deterministic and bounded.

use chrono::NaiveDate;
use journeygen::schema::{DayRecord, EventRecord, MessageRecord};
use journeygen::summarizer::summarize;
use proptest::prelude::*;

fn day_strategy() -> impl Strategy<Value = DayRecord> {
    (
        1u32..=28,
        proptest::collection::vec("[A-Za-z ]{0,12}", 0..4),
        proptest::collection::vec("\\PC{0,200}", 0..4),
    )
        .prop_map(|(d, titles, texts)| DayRecord {
            date: NaiveDate::from_ymd_opt(2025, 8, d).unwrap(),
            day_of_week: "Monday".to_string(),
            month: "August".to_string(),
            summary: String::new(),
            events: titles
                .into_iter()
                .map(|title| EventRecord {
                    event_type: "DIAGNOSTIC".to_string(),
                    title,
                    details: String::new(),
                    triggered_by_message_id: None,
                })
                .collect(),
            messages: texts
                .into_iter()
                .enumerate()
                .map(|(i, text)| MessageRecord {
                    id: format!("msg_{}_{}", d, i),
                    timestamp: "09:00 AM".to_string(),
                    sender: "Rohan Patel".to_string(),
                    text,
                })
                .collect(),
            internal_metrics: serde_json::json!({}),
        })
}

#[test]
fn test_summary_is_deterministic() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(proptest::collection::vec(day_strategy(), 0..6), 1usize..150),
            |(days, preview_chars)| {
                prop_assert_eq!(
                    summarize(&days, preview_chars),
                    summarize(&days, preview_chars)
                );
                Ok(())
            },
        )
        .unwrap();
}

/// Key events never repeat a title.
#[test]
fn test_key_events_are_distinct() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&proptest::collection::vec(day_strategy(), 1..6), |days| {
            let digest = summarize(&days, 100);
            if let Some(line) = digest
                .as_str()
                .lines()
                .find_map(|l| l.strip_prefix("- Key Events: "))
            {
                let titles: Vec<&str> = line.split("; ").collect();
                let mut unique = titles.clone();
                unique.sort_unstable();
                unique.dedup();
                prop_assert_eq!(titles.len(), unique.len());
            }
            Ok(())
        })
        .unwrap();
}
