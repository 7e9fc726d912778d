//! Concurrent recording: lost updates are allowed, overcounting is not.

use std::sync::Arc;
use std::thread;

use visit_counter::{
    parse_counter, InMemoryStore, KeyValueStore, VisitEvent, VisitLog, VisitRecorder, LOG_KEY,
    TOTAL_KEY,
};

use crate::support::clock_at;

const THREADS: usize = 16;
const VISITS_PER_THREAD: usize = 25;

#[test]
fn concurrent_visits_never_overcount() {
    let store = InMemoryStore::new();
    let recorder = Arc::new(
        VisitRecorder::new(store.clone()).with_clock(clock_at("2024-07-01T12:00:00Z")),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let recorder = Arc::clone(&recorder);
            thread::spawn(move || {
                for i in 0..VISITS_PER_THREAD {
                    let event = VisitEvent::get(format!("/t{}/v{}", t, i));
                    assert!(recorder.record_visit(&event).ok);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let n = (THREADS * VISITS_PER_THREAD) as u64;
    let total = parse_counter(store.get(TOTAL_KEY).unwrap().as_deref());
    let day = parse_counter(store.get("day:2024-07-01").unwrap().as_deref());

    assert!((1..=n).contains(&total), "total {} out of range", total);
    assert!((1..=n).contains(&day), "day {} out of range", day);

    let log = VisitLog::decode(store.get(LOG_KEY).unwrap().as_deref());
    assert!(!log.is_empty());
    assert!(log.len() <= 50);
}

#[test]
fn sequential_visits_count_exactly() {
    let store = InMemoryStore::new();
    let recorder = VisitRecorder::new(store.clone()).with_clock(clock_at("2024-07-01T12:00:00Z"));

    for _ in 0..25 {
        recorder.record_visit(&VisitEvent::get("/"));
    }

    assert_eq!(store.get(TOTAL_KEY).unwrap().as_deref(), Some("25"));
    assert_eq!(store.get("day:2024-07-01").unwrap().as_deref(), Some("25"));
}
