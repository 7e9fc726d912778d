//! Best-effort visit tracking over a key-value store.
//!
//! Two operations, both stateless and infallible from the caller's side:
//!
//! - [`VisitRecorder::record_visit`] bumps the all-time and per-day counters
//!   and prepends an entry to a bounded recent-activity log.
//! - [`StatsReporter::get_stats`] reads the total, the most recent day
//!   counters and the log into a [`StatsSnapshot`].
//!
//! Counting is approximate under concurrency: the store only guarantees
//! single-key atomicity and the updates are plain read-modify-write.
//!
//! ## Example
//!
//! ```
//! use visit_counter::{InMemoryStore, VisitEvent, VisitTracker};
//!
//! let tracker = VisitTracker::new(InMemoryStore::new());
//! let ack = tracker.record_visit(&VisitEvent::get("https://example.com/projects"));
//! assert!(ack.ok);
//!
//! let stats = tracker.get_stats();
//! assert_eq!(stats.total, 1);
//! assert_eq!(stats.log[0].path, "/projects");
//! ```

pub mod endpoint;
mod store;
mod tracker;
mod visits;

#[cfg(feature = "http")]
pub mod config;
#[cfg(feature = "http")]
pub mod http;

pub use endpoint::{EndpointResponse, TrackRequest};
pub use store::{InMemoryStore, JsonFileStore, KeyValueStore, StoreError};
pub use tracker::VisitTracker;
pub use visits::{
    day_key, parse_counter, Acknowledgment, Clock, DayCount, FixedClock, RecordError,
    StatsReporter, StatsSnapshot, SystemClock, VisitEvent, VisitLimits, VisitLog, VisitLogEntry,
    VisitMethod, VisitRecorder, DAY_PREFIX, DEFAULT_DAY_WINDOW, DEFAULT_LOG_CAPACITY, LOG_KEY,
    TOTAL_KEY,
};
