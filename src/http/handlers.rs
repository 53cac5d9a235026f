//! Request handlers.

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use url::form_urlencoded;

use crate::http::server::AppState;

/// Name of the query parameter carrying the search term.
pub const TERM_PARAM: &str = "birdName";

/// Decoded value of the first `birdName` pair in a raw query string.
///
/// Later repeats are ignored and an absent parameter yields the empty term.
/// Nothing else in the query is inspected.
pub fn term_from_query(query: Option<&str>) -> String {
    query
        .and_then(|q| {
            form_urlencoded::parse(q.as_bytes())
                .find(|(name, _)| name == TERM_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub version: String,
    pub status: String,
    pub cached_terms: usize,
}

/// `GET <route>?birdName=<term>`
///
/// Serves the cached body for the term, or fetches, rewrites and caches it.
/// Upstream failures are answered with their status and an empty body.
pub async fn lookup_birds(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let start_time = Instant::now();
    let term = term_from_query(query.as_deref());

    match state.lookups.lookup(&term).await {
        Ok(lookup) => {
            tracing::info!(
                term = %term,
                source = lookup.source.as_str(),
                bytes = lookup.body.len(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Lookup served"
            );
            json_response(lookup.body, state.allow_any_origin)
        }
        Err(e) => {
            tracing::warn!(
                term = %term,
                status = %e.status(),
                error = %e,
                "Lookup failed"
            );
            e.into_response()
        }
    }
}

fn json_response(body: String, allow_any_origin: bool) -> Response {
    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response();

    if allow_any_origin {
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
    response
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        cached_terms: state.lookups.cache().len(),
    })
}
