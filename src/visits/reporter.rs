//! StatsReporter - read-only snapshot of the visit counters and log.

use serde::{Deserialize, Serialize};

use super::log::{VisitLog, VisitLogEntry};
use super::{parse_counter, VisitLimits, DAY_PREFIX, LOG_KEY, TOTAL_KEY};
use crate::store::KeyValueStore;

/// Visits counted on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    /// `YYYY-MM-DD`.
    pub day: String,
    pub visits: u64,
}

/// Point-in-time view assembled from several independent reads.
///
/// The reads are not isolated from concurrent recording, so the sum of
/// `day_counts` need not equal `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total: u64,
    /// Most recent days, ascending.
    pub day_counts: Vec<DayCount>,
    /// Recent visits, newest first.
    pub log: Vec<VisitLogEntry>,
}

/// Reads visit statistics from a key-value store.
pub struct StatsReporter<S> {
    store: S,
    limits: VisitLimits,
}

impl<S: KeyValueStore> StatsReporter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            limits: VisitLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: VisitLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Assemble a fresh snapshot. Never fails; a field whose read fails
    /// degrades to zero or empty.
    pub fn get_stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            total: self.read_counter(TOTAL_KEY),
            day_counts: self.read_day_counts(),
            log: self.read_log(),
        }
    }

    fn read_counter(&self, key: &str) -> u64 {
        match self.store.get(key) {
            Ok(raw) => parse_counter(raw.as_deref()),
            Err(e) => {
                tracing::warn!(key, error = %e, "counter read failed, reporting zero");
                0
            }
        }
    }

    fn read_day_counts(&self) -> Vec<DayCount> {
        let mut keys = match self.store.list(DAY_PREFIX) {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(prefix = DAY_PREFIX, error = %e, "day listing failed");
                return Vec::new();
            }
        };
        keys.retain(|k| k.starts_with(DAY_PREFIX));
        // Zero-padded dates sort chronologically.
        keys.sort();
        keys.dedup();

        let skip = keys.len().saturating_sub(self.limits.day_window);
        keys.into_iter()
            .skip(skip)
            .map(|key| DayCount {
                visits: self.read_counter(&key),
                day: key[DAY_PREFIX.len()..].to_string(),
            })
            .collect()
    }

    fn read_log(&self) -> Vec<VisitLogEntry> {
        match self.store.get(LOG_KEY) {
            Ok(raw) => VisitLog::decode(raw.as_deref()).into_entries(),
            Err(e) => {
                tracing::warn!(key = LOG_KEY, error = %e, "log read failed, reporting empty");
                Vec::new()
            }
        }
    }
}
