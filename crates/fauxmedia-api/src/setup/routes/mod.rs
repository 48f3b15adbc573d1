//! Route configuration and setup.
//!
//! Health checks live in [health](health); everything under the upload base that no other
//! route (or file on disk) serves falls through to the missing-upload handler.

mod health;

use crate::handlers::{catalog, missing_upload::missing_upload};
use crate::state::AppState;
use axum::{handler::Handler, routing::get, Router};
use fauxmedia_core::catalog::CATALOG_SCRIPT_PATH;
use fauxmedia_core::Config;
use fauxmedia_infra::request_id_middleware;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let routes = Router::new()
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(CATALOG_SCRIPT_PATH, get(catalog::catalog_script))
        .route("/media-placeholders/info", get(catalog::catalog_info))
        .route(
            "/media-placeholders/dimensions",
            get(catalog::client_dimensions),
        );

    let routes = match config.local_uploads_path() {
        Some(dir) => {
            let upload_base = config.upload_base_path();
            tracing::info!(
                upload_base = %upload_base,
                local_uploads_path = %dir,
                "Serving existing uploads from disk"
            );
            // Directories and non-GET methods go to the resolver like any other miss
            let uploads = ServeDir::new(dir)
                .append_index_html_on_directories(false)
                .call_fallback_on_method_not_allowed(true)
                .fallback(missing_upload.with_state(state.clone()));
            routes
                .nest_service(&upload_base, uploads)
                .fallback(missing_upload)
        }
        None => routes.fallback(missing_upload),
    };

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = routes
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}
