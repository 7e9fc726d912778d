//! Visit data model: storage keys, counters, the recent-activity log and
//! the two operations that touch them.
//!
//! Stored layout:
//!
//! ```text
//! total              -> "1234"                       (decimal counter)
//! day:YYYY-MM-DD     -> "56"                         (decimal counter, UTC day)
//! log                -> [{ts, path, ref, ua, country}, ...]  (newest first)
//! ```

mod clock;
mod log;
mod recorder;
mod reporter;

pub use clock::{Clock, FixedClock, SystemClock};
pub use log::{VisitLog, VisitLogEntry};
pub use recorder::{Acknowledgment, RecordError, VisitEvent, VisitMethod, VisitRecorder};
pub use reporter::{DayCount, StatsReporter, StatsSnapshot};

/// Key of the all-time visit counter.
pub const TOTAL_KEY: &str = "total";

/// Prefix of the per-day counters.
pub const DAY_PREFIX: &str = "day:";

/// Key of the recent-activity log.
pub const LOG_KEY: &str = "log";

/// Default cap on recent-activity log entries.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Default number of most recent days reported.
pub const DEFAULT_DAY_WINDOW: usize = 30;

/// Store key for the counter of `date` (formatted `YYYY-MM-DD`).
pub fn day_key(date: &str) -> String {
    format!("{}{}", DAY_PREFIX, date)
}

/// Parse a stored counter value.
///
/// Absent values and anything without a leading run of digits read as zero.
/// Trailing garbage after the digits is ignored, the way a lenient integer
/// parse treats `"12px"`.
pub fn parse_counter(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse().unwrap_or(0)
}

/// Size limits applied when recording and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitLimits {
    /// Maximum number of entries kept in the recent-activity log.
    pub log_capacity: usize,
    /// Number of most recent day counters returned by a stats snapshot.
    pub day_window: usize,
}

impl Default for VisitLimits {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            day_window: DEFAULT_DAY_WINDOW,
        }
    }
}
