//! HTTP transport for the visit endpoints.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `ANY /api/track` - record a visit. `GET`, or `POST` with an optional
//!   `{ "path"?: string, "ref"?: string }` body. Other verbs get `405`.
//! - `GET /api/stats` - `{ total, dayCounts, log }` snapshot.
//! - `GET /health` - `{ "ok": true }`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use visit_counter::{http, InMemoryStore, VisitTracker};
//!
//! let state = Arc::new(http::HttpState::new(VisitTracker::new(InMemoryStore::new())));
//! let app = http::router(state.clone());
//! http::serve(state, "0.0.0.0:3000").await?;
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde_json::json;

use crate::endpoint::{self, EndpointResponse, TrackRequest};
use crate::store::KeyValueStore;
use crate::tracker::VisitTracker;
use crate::visits::Clock;

/// Header carrying the visitor's country, as set by the CDN in front of the site.
pub const DEFAULT_COUNTRY_HEADER: &str = "cf-ipcountry";

/// Shared state behind the router.
pub struct HttpState<S, C> {
    tracker: VisitTracker<S, C>,
    country_header: String,
}

impl<S: KeyValueStore, C: Clock> HttpState<S, C> {
    pub fn new(tracker: VisitTracker<S, C>) -> Self {
        Self {
            tracker,
            country_header: DEFAULT_COUNTRY_HEADER.to_string(),
        }
    }

    /// Read the country hint from `name` instead of the default header.
    pub fn with_country_header(mut self, name: &str) -> Self {
        self.country_header = name.to_ascii_lowercase();
        self
    }
}

/// Build an axum `Router` serving the visit endpoints.
pub fn router<S, C>(state: Arc<HttpState<S, C>>) -> Router
where
    S: KeyValueStore + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/track", any(track_handler::<S, C>))
        .route("/api/stats", get(stats_handler::<S, C>))
        .with_state(state)
}

/// Serve the endpoints over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S, C>(state: Arc<HttpState<S, C>>, addr: &str) -> Result<(), std::io::Error>
where
    S: KeyValueStore + 'static,
    C: Clock + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_until(state, listener, std::future::pending::<()>()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve_until<S, C, F>(
    state: Arc<HttpState<S, C>>,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    S: KeyValueStore + 'static,
    C: Clock + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "visit endpoints listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// `GET /health` - returns `{ "ok": true }`.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// `ANY /api/track` - record one visit.
async fn track_handler<S, C>(
    State(state): State<Arc<HttpState<S, C>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    S: KeyValueStore + 'static,
    C: Clock + 'static,
{
    let mut request = TrackRequest::new(method.as_str(), uri.to_string());
    for name in [header::USER_AGENT, header::REFERER] {
        if let Some(value) = headers.get(&name).and_then(|v| v.to_str().ok()) {
            request = request.header(name.as_str(), value);
        }
    }
    if let Some(country) = headers
        .get(state.country_header.as_str())
        .and_then(|v| v.to_str().ok())
    {
        request = request.country(country);
    }
    // An oversized or unreadable body still counts the visit, just without overrides.
    match body {
        Ok(body) if !body.is_empty() => request = request.body(body.to_vec()),
        Ok(_) => {}
        Err(e) => tracing::debug!(error = %e, "tracking body ignored"),
    }

    into_response(endpoint::track(state.tracker.recorder(), &request))
}

/// `GET /api/stats` - current snapshot.
async fn stats_handler<S, C>(State(state): State<Arc<HttpState<S, C>>>) -> Response
where
    S: KeyValueStore + 'static,
    C: Clock + 'static,
{
    into_response(endpoint::stats(state.tracker.reporter()))
}

fn into_response(reply: EndpointResponse) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(reply.content_type))],
        reply.body,
    )
        .into_response();
    if let Some(cache_control) = reply.cache_control {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
    }
    response
}
