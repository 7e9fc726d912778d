//! Recent-activity log: a bounded, newest-first list stored as one JSON array.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded visit.
///
/// Serialized with the short field names used in storage and in the stats
/// response (`ts`, `path`, `ref`, `ua`, `country`). Missing fields read as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitLogEntry {
    #[serde(rename = "ts")]
    pub timestamp: String,
    pub path: String,
    #[serde(rename = "ref")]
    pub referrer: String,
    #[serde(rename = "ua")]
    pub user_agent: String,
    pub country: String,
}

/// Newest-first sequence of visit entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitLog {
    entries: Vec<VisitLogEntry>,
}

impl VisitLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stored log value.
    ///
    /// Absent, unparseable or non-array values decode to an empty log.
    /// Array elements that are not entry-shaped objects are dropped, so a
    /// log decoded and re-encoded during recording loses them from storage.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => Self {
                entries: items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            },
            Ok(_) => {
                tracing::warn!("stored visit log is not an array, treating as empty");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored visit log is not valid JSON, treating as empty");
                Self::default()
            }
        }
    }

    /// Encode as a JSON array string.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries)
    }

    /// Insert `entry` as the newest element, dropping the oldest beyond `capacity`.
    pub fn push_front(&mut self, entry: VisitLogEntry, capacity: usize) {
        self.entries.insert(0, entry);
        self.entries.truncate(capacity);
    }

    pub fn entries(&self) -> &[VisitLogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<VisitLogEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
