//! Framework-agnostic HTTP request/response types for the visit endpoints.
//!
//! These bridge an HTTP server and the tracker. The axum wiring lives in
//! the `http` module; anything else can drive these functions directly.

use std::collections::HashMap;

use serde::Serialize;

use crate::store::KeyValueStore;
use crate::visits::{Clock, StatsReporter, VisitEvent, VisitMethod, VisitRecorder};

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// An inbound request to the tracking endpoint.
#[derive(Debug, Clone, Default)]
pub struct TrackRequest {
    pub method: String,
    pub url: String,
    /// Header names are stored lower-cased.
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    /// Geo hint attached by the edge, if any.
    pub country: Option<String>,
}

impl TrackRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Convert into a visit event. `None` if the method is not accepted.
    pub fn to_event(&self) -> Option<VisitEvent> {
        let method = VisitMethod::parse(&self.method)?;
        Some(VisitEvent {
            method,
            url: self.url.clone(),
            user_agent: self.headers.get("user-agent").cloned(),
            referer: self.headers.get("referer").cloned(),
            country: self.country.clone(),
            body: self.body.clone(),
        })
    }
}

/// Response produced by an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub cache_control: Option<&'static str>,
    pub body: String,
}

impl EndpointResponse {
    /// `200 OK` JSON reply, never cached.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status: 200,
                content_type: CONTENT_TYPE_JSON,
                cache_control: Some(CACHE_CONTROL_NO_STORE),
                body,
            },
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                Self::text(500, "Internal Server Error")
            }
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::text(405, "Method Not Allowed")
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: CONTENT_TYPE_TEXT,
            cache_control: None,
            body: body.to_string(),
        }
    }
}

/// Handle a request to the tracking endpoint.
///
/// Rejected methods get `405` before the store is touched. Every accepted
/// request gets `200`, with `{"ok":false}` when recording failed.
pub fn track<S: KeyValueStore, C: Clock>(
    recorder: &VisitRecorder<S, C>,
    request: &TrackRequest,
) -> EndpointResponse {
    match request.to_event() {
        Some(event) => EndpointResponse::json(&recorder.record_visit(&event)),
        None => {
            tracing::debug!(method = %request.method, "tracking request rejected");
            EndpointResponse::method_not_allowed()
        }
    }
}

/// Handle a request to the stats endpoint.
pub fn stats<S: KeyValueStore>(reporter: &StatsReporter<S>) -> EndpointResponse {
    EndpointResponse::json(&reporter.get_stats())
}
