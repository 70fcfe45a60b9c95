use axum::{
    Json,
    extract::{RawQuery, State},
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

use crate::cache::make_cache_key;
use crate::error::ApiError;
use crate::metrics::{
    CACHE_HITS, CACHE_MISSES, CACHE_SIZE, REQUEST_LATENCY, REQUEST_TOTAL, UPSTREAM_FAILURES,
};
use crate::models::QueryParams;
use crate::state::AppState;

// Only bodies with `"success": true` are worth caching
fn is_success(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool) == Some(true)
}

// GET /api/currency
// upstream bodies are relayed with 200 whether or not they report success,
// only successful ones are cached. unreachable API -> fixed 502 body,
// query that doesn't decode to UTF-8 -> 400
pub async fn currency_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Value>, ApiError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let params = QueryParams::parse(raw.as_deref().unwrap_or_default())?;
    let cache_key = make_cache_key(&params);

    if let Some(cached) = state.cache.get(&cache_key) {
        CACHE_HITS.inc();
        REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
        return Ok(Json(cached));
    }
    CACHE_MISSES.inc();

    let body = state.upstream.fetch(&params).await.map_err(|e| {
        UPSTREAM_FAILURES.inc();
        error!(error = %e, url = %state.upstream.url(), "currency API request failed");
        REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
        ApiError::UpstreamUnavailable
    })?;

    if is_success(&body) {
        state.cache.set(&cache_key, body.clone(), Utc::now() + state.ttl);
        CACHE_SIZE.set(state.cache.len() as f64);
    }

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    Ok(Json(body))
}
