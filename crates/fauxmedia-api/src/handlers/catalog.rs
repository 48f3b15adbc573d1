//! Offline-mode catalog endpoints
//!
//! The browser-side fallback loads the catalog script once and sizes placeholders for
//! failing images from it. `dimensions` exposes the same decision server-side.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use fauxmedia_core::{AppError, ClientDimensions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SCRIPT_CONTENT_TYPE: &str = "application/javascript; charset=utf-8";
const CACHE_VERSIONED: &str = "public, max-age=31536000, immutable";
const CACHE_UNVERSIONED: &str = "no-cache";

#[derive(Debug, Deserialize)]
pub struct CatalogScriptQuery {
    pub ver: Option<String>,
}

/// Serve the catalog script.
///
/// Cacheable for a year only when requested with the current `ver`; a stale or missing
/// version gets `no-cache` so the next regeneration is picked up.
#[tracing::instrument(skip(state, headers))]
pub async fn catalog_script(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogScriptQuery>,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let snapshot = state.catalog.current().await;
    let etag = format!("\"{}\"", snapshot.version());
    let cache_control = if query.ver.as_deref() == Some(snapshot.version()) {
        CACHE_VERSIONED
    } else {
        CACHE_UNVERSIONED
    };

    let etag_value = HeaderValue::from_str(&etag)
        .map_err(|e| AppError::Internal(format!("Invalid catalog ETag: {}", e)))?;
    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|tags| tags.split(',').any(|t| t.trim() == etag));

    if not_modified {
        return Ok((
            StatusCode::NOT_MODIFIED,
            [
                (header::ETAG, etag_value),
                (header::CACHE_CONTROL, HeaderValue::from_static(cache_control)),
            ],
        )
            .into_response());
    }

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(SCRIPT_CONTENT_TYPE),
            ),
            (header::ETAG, etag_value),
            (header::CACHE_CONTROL, HeaderValue::from_static(cache_control)),
        ],
        snapshot.script(),
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct CatalogInfoResponse {
    pub offline_mode: bool,
    pub builder: String,
    pub catalog_url: String,
    pub catalog_entries: usize,
    pub generated_at: DateTime<Utc>,
}

/// Current mode, builder and catalog version.
pub async fn catalog_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.catalog.current().await;
    Json(CatalogInfoResponse {
        offline_mode: state.resolver.offline_mode(),
        builder: state.resolver.builder_name(),
        catalog_url: snapshot.script_url(),
        catalog_entries: snapshot.len(),
        generated_at: snapshot.generated_at(),
    })
}

#[derive(Debug, Deserialize)]
pub struct DimensionsQuery {
    pub src: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Size the client fallback would use for a failing image.
#[tracing::instrument(skip(state))]
pub async fn client_dimensions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DimensionsQuery>,
) -> Result<Json<ClientDimensions>, HttpAppError> {
    let src = query
        .src
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("src query parameter is required".to_string()))?;

    let snapshot = state.catalog.current().await;
    Ok(Json(snapshot.client_dimensions(
        &src,
        query.width.as_deref(),
        query.height.as_deref(),
    )))
}
