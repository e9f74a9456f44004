//! Property tests for the frontmatter merger.
//!
//! - merging is idempotent
//! - body text is kept byte-for-byte
//! - unmanaged keys keep their values and relative order
//! - a note without frontmatter ends up with exactly the managed keys

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;
use rize_sync::{DailyMetrics, MANAGED_KEYS, NoteDocument, merge_frontmatter};

fn metrics_strategy() -> impl Strategy<Value = DailyMetrics> {
    (0.0f64..24.0, 0.0f64..24.0, 0.0f64..24.0, 0.0f64..24.0).prop_map(
        |(work_hours, focus_time, break_time, meeting_time)| DailyMetrics {
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            work_hours,
            focus_time,
            break_time,
            meeting_time,
        },
    )
}

fn sync_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Unmanaged `key: value` pairs with unique keys, in generation order.
fn fields_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z][a-z_]{0,10}", "[A-Za-z0-9.]{1,16}"), 0..8).prop_map(|pairs| {
        let mut seen = HashSet::new();
        pairs
            .into_iter()
            .filter(|(key, _)| !MANAGED_KEYS.contains(&key.as_str()) && seen.insert(key.clone()))
            .collect()
    })
}

fn body_strategy() -> impl Strategy<Value = String> {
    "(#? ?[A-Za-z0-9 ,.:!-]{0,40}\n){0,6}[A-Za-z0-9 ]{0,20}"
}

fn note_with(fields: &[(String, String)], body: &str) -> String {
    let mut content = String::from("---\n");
    for (key, value) in fields {
        content.push_str(&format!("{}: {}\n", key, value));
    }
    content.push_str("---\n");
    content.push_str(body);
    content
}

proptest! {
    #[test]
    fn prop_merge_is_idempotent(
        fields in fields_strategy(),
        body in body_strategy(),
        metrics in metrics_strategy(),
        sync_date in sync_date_strategy(),
    ) {
        let content = note_with(&fields, &body);
        let once = merge_frontmatter(&content, &metrics, sync_date);
        let twice = merge_frontmatter(&once, &metrics, sync_date);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_plain_note_merge_is_idempotent(
        body in body_strategy(),
        metrics in metrics_strategy(),
        sync_date in sync_date_strategy(),
    ) {
        let once = merge_frontmatter(&body, &metrics, sync_date);
        let twice = merge_frontmatter(&once, &metrics, sync_date);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_body_preserved(
        fields in fields_strategy(),
        body in body_strategy(),
        metrics in metrics_strategy(),
        sync_date in sync_date_strategy(),
    ) {
        let content = note_with(&fields, &body);
        let merged = merge_frontmatter(&content, &metrics, sync_date);
        let document = NoteDocument::parse(&merged);
        prop_assert_eq!(document.body(), body.as_str());
    }

    #[test]
    fn prop_unmanaged_keys_preserved_in_order(
        fields in fields_strategy(),
        body in body_strategy(),
        metrics in metrics_strategy(),
        sync_date in sync_date_strategy(),
    ) {
        let content = note_with(&fields, &body);
        let merged = merge_frontmatter(&content, &metrics, sync_date);
        let document = NoteDocument::parse(&merged);

        let unmanaged: Vec<&str> = document
            .frontmatter
            .keys()
            .into_iter()
            .filter(|key| !MANAGED_KEYS.contains(key))
            .collect();
        let expected: Vec<&str> = fields.iter().map(|(key, _)| key.as_str()).collect();
        prop_assert_eq!(unmanaged, expected);

        for (key, value) in &fields {
            prop_assert_eq!(document.frontmatter.get(key), Some(value.as_str()));
        }
    }

    #[test]
    fn prop_plain_note_gets_exactly_managed_keys(
        body in body_strategy(),
        metrics in metrics_strategy(),
        sync_date in sync_date_strategy(),
    ) {
        prop_assume!(!body.starts_with("---"));

        let merged = merge_frontmatter(&body, &metrics, sync_date);
        let document = NoteDocument::parse(&merged);

        prop_assert!(document.has_frontmatter());
        prop_assert_eq!(document.frontmatter.keys(), MANAGED_KEYS.to_vec());
        prop_assert!(merged.ends_with(&body));
        let expected_last_sync = format!("'{}'", sync_date.format("%Y-%m-%d"));
        prop_assert_eq!(document.frontmatter.get("rize_last_sync"), Some(expected_last_sync.as_str()));
    }
}

#[test]
fn empty_note_scenario() {
    let metrics = DailyMetrics {
        date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        work_hours: 4.25,
        focus_time: 2.5,
        break_time: 0.5,
        meeting_time: 1.0,
    };
    let sync_date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();

    let merged = merge_frontmatter("", &metrics, sync_date);
    let lines: Vec<&str> = merged.lines().collect();
    assert_eq!(
        lines,
        vec![
            "---",
            "rize_work_hours: 4.25",
            "rize_focus_time: 2.5",
            "rize_break_time: 0.5",
            "rize_meeting_time: 1.0",
            "rize_last_sync: '2026-01-05'",
            "---",
        ]
    );
}
