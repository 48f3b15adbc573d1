//! Redirect handler for requests that reached no real file

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{OriginalUri, State},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use fauxmedia_core::{AppError, Config, RedirectDecision, UploadRequest};
use std::sync::Arc;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Whether the client's original request was made over HTTPS.
pub fn request_is_secure(config: &Config, uri: &Uri, headers: &HeaderMap) -> bool {
    if config.force_https() || uri.scheme_str() == Some("https") {
        return true;
    }
    config.trust_forwarded_proto()
        && headers
            .get(FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

fn request_host(uri: &Uri, headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()))
}

/// Build the `UploadRequest` for an incoming request.
pub fn upload_request(config: &Config, uri: &Uri, headers: &HeaderMap) -> UploadRequest {
    let request_uri = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    UploadRequest::new(
        request_uri,
        request_host(uri, headers),
        request_is_secure(config, uri, headers),
    )
}

fn found(location: &str) -> Result<Response, HttpAppError> {
    let location = HeaderValue::from_str(location).map_err(|e| {
        AppError::Internal(format!("Invalid redirect location {:?}: {}", location, e))
    })?;
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

/// Fallback for everything no other route (or file) served.
///
/// Issues a 302 to the placeholder or override host, or a 404 when the pipeline passes.
#[tracing::instrument(skip_all, fields(uri = %uri))]
pub async fn missing_upload(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<Response, HttpAppError> {
    let request = upload_request(&state.config, &uri, &headers);

    match state.resolver.resolve(&request).await? {
        RedirectDecision::PassThrough(reason) => {
            tracing::debug!(reason = reason.as_str(), "Passing request through");
            Err(AppError::NotFound(format!(
                "No placeholder for this request ({})",
                reason.as_str()
            ))
            .into())
        }
        RedirectDecision::RedirectToServer(location) => {
            tracing::info!(location = %location, "Redirecting to override server");
            found(&location)
        }
        RedirectDecision::RedirectToPlaceholder(location) => {
            tracing::info!(location = %location, "Redirecting to placeholder");
            found(&location)
        }
    }
}
