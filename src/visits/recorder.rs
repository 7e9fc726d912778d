//! VisitRecorder - best-effort counting of one visit at a time.
//!
//! Each call performs three independent read-modify-write sequences
//! (total, day, log). There is no transaction across them and no lock:
//! concurrent calls may lose increments, and a failure part-way leaves the
//! keys written so far in place.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clock::{date_string, timestamp_string, Clock, SystemClock};
use super::log::{VisitLog, VisitLogEntry};
use super::{day_key, parse_counter, VisitLimits, LOG_KEY, TOTAL_KEY};
use crate::store::{KeyValueStore, StoreError};

/// HTTP verbs accepted for visit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitMethod {
    Get,
    Post,
}

impl VisitMethod {
    /// Parse a request method. Returns `None` for anything but `GET` and `POST`.
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(VisitMethod::Get),
            "POST" => Some(VisitMethod::Post),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitMethod::Get => "GET",
            VisitMethod::Post => "POST",
        }
    }
}

/// An inbound visit signal.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub method: VisitMethod,
    /// Request target, absolute (`https://host/path?q`) or origin-form (`/path?q`).
    pub url: String,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    /// Best-effort geo hint from request metadata.
    pub country: Option<String>,
    /// Raw request body. Only read for `POST`.
    pub body: Option<Vec<u8>>,
}

impl VisitEvent {
    pub fn new(method: VisitMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            user_agent: None,
            referer: None,
            country: None,
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(VisitMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(VisitMethod::Post, url)
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Build the log entry for this visit at `now`.
    ///
    /// The body's `path` and `ref` string fields override the URL path and
    /// the `referer` header. A body that is not a JSON object is ignored.
    pub fn log_entry(&self, now: DateTime<Utc>) -> VisitLogEntry {
        let overrides = self.body_object();
        let body_field = |name: &str| {
            overrides
                .as_ref()
                .and_then(|body| body.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        VisitLogEntry {
            timestamp: timestamp_string(now),
            path: body_field("path").unwrap_or_else(|| url_path(&self.url).to_string()),
            referrer: body_field("ref")
                .or_else(|| self.referer.clone())
                .unwrap_or_default(),
            user_agent: self.user_agent.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
        }
    }

    fn body_object(&self) -> Option<serde_json::Map<String, Value>> {
        if self.method != VisitMethod::Post {
            return None;
        }
        let bytes = self.body.as_deref()?;
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// Path component of a request target, without query or fragment.
pub(crate) fn url_path(url: &str) -> &str {
    let rest = if url.starts_with('/') {
        url
    } else {
        match url.find("://") {
            Some(scheme_end) => {
                let after = &url[scheme_end + 3..];
                match after.find(['/', '?', '#']) {
                    Some(authority_end) => &after[authority_end..],
                    None => "",
                }
            }
            None => url,
        }
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    match &rest[..end] {
        "" => "/",
        path => path,
    }
}

/// Outcome reported back to whoever triggered the visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub ok: bool,
}

impl Acknowledgment {
    pub fn recorded() -> Self {
        Self { ok: true }
    }

    pub fn not_recorded() -> Self {
        Self { ok: false }
    }
}

/// Failure inside a recording attempt. Never escapes `record_visit`.
#[derive(Debug)]
pub enum RecordError {
    Store(StoreError),
    Encode(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Store(e) => write!(f, "store error: {}", e),
            RecordError::Encode(msg) => write!(f, "encode failed: {}", msg),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Store(e) => Some(e),
            RecordError::Encode(_) => None,
        }
    }
}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        RecordError::Store(err)
    }
}

impl From<serde_json::Error> for RecordError {
    fn from(err: serde_json::Error) -> Self {
        RecordError::Encode(err.to_string())
    }
}

/// Records visits into a key-value store.
///
/// Holds no counters of its own; every call re-reads the store.
pub struct VisitRecorder<S, C = SystemClock> {
    store: S,
    clock: C,
    limits: VisitLimits,
}

impl<S: KeyValueStore> VisitRecorder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
            limits: VisitLimits::default(),
        }
    }
}

impl<S: KeyValueStore, C: Clock> VisitRecorder<S, C> {
    /// Replace the time source.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> VisitRecorder<S, C2> {
        VisitRecorder {
            store: self.store,
            clock,
            limits: self.limits,
        }
    }

    pub fn with_limits(mut self, limits: VisitLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Count one visit and prepend it to the recent-activity log.
    ///
    /// Never fails: any store or encoding error is logged and reported as
    /// `Acknowledgment { ok: false }`.
    pub fn record_visit(&self, event: &VisitEvent) -> Acknowledgment {
        match self.try_record(event) {
            Ok(()) => Acknowledgment::recorded(),
            Err(e) => {
                tracing::warn!(error = %e, url = %event.url, "visit not recorded");
                Acknowledgment::not_recorded()
            }
        }
    }

    fn try_record(&self, event: &VisitEvent) -> Result<(), RecordError> {
        let now = self.clock.now();
        let day_key = day_key(&date_string(now));

        let total = parse_counter(self.store.get(TOTAL_KEY)?.as_deref()).saturating_add(1);
        let day = parse_counter(self.store.get(&day_key)?.as_deref()).saturating_add(1);

        self.store.put(TOTAL_KEY, total.to_string())?;
        self.store.put(&day_key, day.to_string())?;

        let entry = event.log_entry(now);
        let mut log = VisitLog::decode(self.store.get(LOG_KEY)?.as_deref());
        log.push_front(entry, self.limits.log_capacity);
        self.store.put(LOG_KEY, log.encode()?)?;

        tracing::debug!(total, key = %day_key, day, "visit recorded");
        Ok(())
    }
}
