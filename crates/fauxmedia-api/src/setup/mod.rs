//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use fauxmedia_core::{
    upload_base_protocol_relative, AttachmentStore, BuilderRegistry, CatalogHandle,
    CatalogSnapshot, Config, NoOpHooks, PlaceholderHooks, PlaceholderResolver, ResolverSettings,
};
use fauxmedia_db::AttachmentRepository;
use fauxmedia_infra::{init_telemetry, LogFormat};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    init_telemetry(LogFormat::for_environment(config.environment()))
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let store: Arc<dyn AttachmentStore> = Arc::new(AttachmentRepository::new(pool));

    let state = build_state(config.clone(), store, Arc::new(NoOpHooks)).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Wire the resolver and publish the first catalog.
pub async fn build_state(
    config: Config,
    store: Arc<dyn AttachmentStore>,
    hooks: Arc<dyn PlaceholderHooks>,
) -> Result<Arc<AppState>> {
    let registry = Arc::new(BuilderRegistry::builtin());
    let resolver = PlaceholderResolver::new(
        store.clone(),
        registry,
        ResolverSettings::from_config(&config),
    )
    .with_hooks(hooks);

    let base_url = upload_base_protocol_relative(config.upload_base_url());
    let catalog = Arc::new(CatalogHandle::new(CatalogSnapshot::empty(base_url.clone())?));
    catalog
        .regenerate(store.as_ref(), &base_url)
        .await
        .context("Failed to generate media placeholder catalog")?;

    tracing::info!(
        builder = %resolver.builder_name(),
        offline_mode = resolver.offline_mode(),
        redirect_server = ?config.redirect_server(),
        upload_base = %config.upload_base_path(),
        "Placeholder resolver ready"
    );

    Ok(Arc::new(AppState {
        config,
        resolver,
        catalog,
    }))
}
