//! Configuration validation
//!
//! Checks that cannot live in `Config::validate` because they need the builder registry
//! or the filesystem, plus warnings for settings that are legal but probably unintended.

use anyhow::Result;
use fauxmedia_core::{BuilderRegistry, Config};
use std::path::Path;

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    let registry = BuilderRegistry::builtin();
    if !registry.contains(config.placeholder_builder()) {
        tracing::warn!(
            builder = %config.placeholder_builder(),
            available = %registry.names().join(","),
            "Configured placeholder builder is not registered - missing uploads will not be redirected"
        );
    }

    if let Some(dir) = config.local_uploads_path() {
        if !Path::new(dir).is_dir() {
            tracing::warn!(
                local_uploads_path = %dir,
                "LOCAL_UPLOADS_PATH is not a directory - every upload request will reach the placeholder pipeline"
            );
        }
    }

    if config.is_production() && !config.offline_mode() && config.redirect_server().is_none() {
        tracing::warn!(
            "Placeholder redirects are active in production - missing uploads will be replaced by placeholder images"
        );
    }

    if config.large_size_w().is_none() || config.large_size_h().is_none() {
        tracing::warn!(
            large_size_w = ?config.large_size_w(),
            large_size_h = ?config.large_size_h(),
            "No default size for at least one axis - placeholders for attachments without metadata may be malformed"
        );
    }

    Ok(())
}
