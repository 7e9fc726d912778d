use visit_counter::{
    day_key, DayCount, InMemoryStore, KeyValueStore, StatsReporter, StatsSnapshot, VisitEvent,
    VisitLimits, VisitTracker,
};

use crate::support::{clock_at, FaultyStore};

fn date(offset: u32) -> String {
    // 40 consecutive days starting 2024-01-01.
    let day = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        + chrono::Days::new(u64::from(offset));
    day.format("%Y-%m-%d").to_string()
}

#[test]
fn total_only() {
    let store = InMemoryStore::with_entries([("total", "7")]);
    let stats = StatsReporter::new(store).get_stats();

    assert_eq!(
        stats,
        StatsSnapshot {
            total: 7,
            day_counts: vec![],
            log: vec![],
        }
    );
}

#[test]
fn keeps_latest_thirty_days_ascending() {
    let store = InMemoryStore::new();
    for i in 0..40 {
        store
            .put(&day_key(&date(i)), (i + 1).to_string())
            .unwrap();
    }
    let stats = StatsReporter::new(store).get_stats();

    assert_eq!(stats.day_counts.len(), 30);
    assert_eq!(stats.day_counts[0].day, date(10));
    assert_eq!(stats.day_counts[0].visits, 11);
    assert_eq!(stats.day_counts[29].day, date(39));
    assert_eq!(stats.day_counts[29].visits, 40);
    assert!(stats
        .day_counts
        .windows(2)
        .all(|pair| pair[0].day < pair[1].day));
}

#[test]
fn unordered_listing_is_sorted() {
    let inner = InMemoryStore::with_entries([
        ("day:2024-02-01", "2"),
        ("day:2023-12-31", "1"),
        ("day:2024-02-10", "3"),
    ]);
    let stats = StatsReporter::new(FaultyStore::new(inner)).get_stats();

    let days: Vec<_> = stats.day_counts.iter().map(|d| d.day.as_str()).collect();
    assert_eq!(days, vec!["2023-12-31", "2024-02-01", "2024-02-10"]);
}

#[test]
fn custom_day_window() {
    let store = InMemoryStore::with_entries([
        ("day:2024-01-01", "1"),
        ("day:2024-01-02", "2"),
        ("day:2024-01-03", "3"),
    ]);
    let stats = StatsReporter::new(store)
        .with_limits(VisitLimits {
            day_window: 2,
            ..Default::default()
        })
        .get_stats();

    assert_eq!(
        stats.day_counts,
        vec![
            DayCount {
                day: "2024-01-02".into(),
                visits: 2
            },
            DayCount {
                day: "2024-01-03".into(),
                visits: 3
            },
        ]
    );
}

#[test]
fn corrupt_values_degrade_to_zero() {
    let store = InMemoryStore::with_entries([
        ("total", "not-a-number"),
        ("day:2024-01-01", "garbage"),
        ("log", "{not json"),
    ]);
    let stats = StatsReporter::new(store).get_stats();

    assert_eq!(stats.total, 0);
    assert_eq!(
        stats.day_counts,
        vec![DayCount {
            day: "2024-01-01".into(),
            visits: 0
        }]
    );
    assert!(stats.log.is_empty());
}

#[test]
fn non_array_log_reads_empty() {
    let store = InMemoryStore::with_entries([("log", r#"{"ts":"2024-01-01"}"#)]);
    assert!(StatsReporter::new(store).get_stats().log.is_empty());
}

#[test]
fn failing_reads_degrade_per_field() {
    let inner = InMemoryStore::with_entries([
        ("total", "5"),
        ("day:2024-01-01", "5"),
        ("log", r#"[{"path":"/about"}]"#),
    ]);
    let store = FaultyStore::new(inner);
    store.fail_get("total");
    store.fail_get("day:2024-01-01");

    let stats = StatsReporter::new(store).get_stats();

    assert_eq!(stats.total, 0);
    assert_eq!(stats.day_counts[0].visits, 0);
    assert_eq!(stats.log.len(), 1);
    assert_eq!(stats.log[0].path, "/about");
}

#[test]
fn failing_log_read_empties_log_only() {
    let inner = InMemoryStore::with_entries([
        ("total", "5"),
        ("day:2024-01-01", "5"),
        ("log", r#"[{"path":"/about"},{"path":"/"}]"#),
    ]);
    let store = FaultyStore::new(inner);
    store.fail_get("log");

    let stats = StatsReporter::new(store).get_stats();

    assert_eq!(stats.total, 5);
    assert_eq!(
        stats.day_counts,
        vec![DayCount {
            day: "2024-01-01".into(),
            visits: 5
        }]
    );
    assert!(stats.log.is_empty());
}

#[test]
fn failing_listing_empties_day_counts_only() {
    let store = FaultyStore::new(InMemoryStore::with_entries([("total", "5")]));
    store.fail_list();

    let stats = StatsReporter::new(store).get_stats();

    assert_eq!(stats.total, 5);
    assert!(stats.day_counts.is_empty());
}

#[test]
fn reporting_never_writes() {
    let store = FaultyStore::new(InMemoryStore::with_entries([("total", "5")]));
    let reporter = StatsReporter::new(store.clone());

    reporter.get_stats();
    reporter.get_stats();

    assert_eq!(store.ops().puts, 0);
}

#[test]
fn every_call_rereads_the_store() {
    let tracker =
        VisitTracker::new(InMemoryStore::new()).with_clock(clock_at("2024-05-05T09:00:00Z"));

    assert_eq!(tracker.get_stats().total, 0);
    tracker.record_visit(&VisitEvent::get("/").user_agent("curl/8"));
    let stats = tracker.get_stats();

    assert_eq!(stats.total, 1);
    assert_eq!(
        stats.day_counts,
        vec![DayCount {
            day: "2024-05-05".into(),
            visits: 1
        }]
    );
    assert_eq!(stats.log.len(), 1);
    assert_eq!(stats.log[0].user_agent, "curl/8");
}
