//! Missing-upload resolution pipeline
//!
//! request path -> upload-root check -> filename decomposition -> attachment lookup ->
//! redirect-server override -> dimension fallback -> builder -> URL rewrite hook.

use std::sync::Arc;

use crate::builders::{BuilderRegistry, PlaceholderArgs};
use crate::config::{upload_base_path, Config};
use crate::dimensions::{DimensionSources, ResolvedDimensions};
use crate::error::AppError;
use crate::filename::decompose;
use crate::hooks::{NoOpHooks, PlaceholderHooks};
use crate::models::{PassThroughReason, RedirectDecision, UploadRequest};
use crate::store::AttachmentStore;

/// Settings the resolver reads on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Upload base path without trailing slash, e.g. `/wp-content/uploads`.
    pub upload_base_path: String,
    pub placeholder_builder: String,
    pub redirect_server: Option<String>,
    pub offline_mode: bool,
    pub default_width: Option<u32>,
    pub default_height: Option<u32>,
}

impl ResolverSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            upload_base_path: upload_base_path(config.upload_base_url()),
            placeholder_builder: config.placeholder_builder().to_string(),
            redirect_server: config.redirect_server().map(str::to_string),
            offline_mode: config.offline_mode(),
            default_width: config.large_size_w(),
            default_height: config.large_size_h(),
        }
    }
}

/// Turns a request for a missing upload into a redirect decision.
#[derive(Clone)]
pub struct PlaceholderResolver {
    store: Arc<dyn AttachmentStore>,
    registry: Arc<BuilderRegistry>,
    hooks: Arc<dyn PlaceholderHooks>,
    settings: ResolverSettings,
}

impl PlaceholderResolver {
    pub fn new(
        store: Arc<dyn AttachmentStore>,
        registry: Arc<BuilderRegistry>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            store,
            registry,
            hooks: Arc::new(NoOpHooks),
            settings,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn PlaceholderHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn AttachmentStore> {
        &self.store
    }

    /// Effective offline-mode flag after hooks.
    pub fn offline_mode(&self) -> bool {
        self.hooks.offline_mode(self.settings.offline_mode)
    }

    /// Effective builder name after hooks.
    pub fn builder_name(&self) -> String {
        self.hooks.builder_name(&self.settings.placeholder_builder)
    }

    /// Resolve one request.
    ///
    /// Every "not applicable" outcome is an `Ok(PassThrough)`, including an unregistered
    /// builder, which is logged as a warning. Only store failures are errors.
    #[tracing::instrument(skip(self, request), fields(uri = %request.request_uri))]
    pub async fn resolve(&self, request: &UploadRequest) -> Result<RedirectDecision, AppError> {
        let Some(relative_path) = request.relative_upload_path(&self.settings.upload_base_path)
        else {
            return Ok(RedirectDecision::PassThrough(
                PassThroughReason::OutsideUploadRoot,
            ));
        };

        if self.offline_mode() {
            return Ok(RedirectDecision::PassThrough(PassThroughReason::OfflineMode));
        }

        let decomposed = decompose(&relative_path);
        tracing::debug!(
            relative_path = %relative_path,
            canonical = %decomposed.canonical,
            width = ?decomposed.width,
            height = ?decomposed.height,
            size_variant = decomposed.is_size_variant(),
            "Decomposed upload path"
        );

        let Some(attachment) = self.store.find_by_filename(&decomposed.canonical).await? else {
            return Ok(RedirectDecision::PassThrough(
                PassThroughReason::AttachmentNotFound,
            ));
        };
        if !attachment.is_image() {
            return Ok(RedirectDecision::PassThrough(PassThroughReason::NotAnImage));
        }

        let redirect_server = self
            .hooks
            .redirect_server(self.settings.redirect_server.as_deref(), attachment.id)
            .filter(|s| !s.trim().is_empty());
        if let Some(server) = redirect_server {
            return Ok(RedirectDecision::RedirectToServer(request.on_server(&server)));
        }

        let dimensions = ResolvedDimensions::resolve(
            DimensionSources {
                from_filename: decomposed.width,
                from_attachment: attachment.original_width(),
                site_default: self.settings.default_width,
            },
            DimensionSources {
                from_filename: decomposed.height,
                from_attachment: attachment.original_height(),
                site_default: self.settings.default_height,
            },
        );
        if !dimensions.is_complete() {
            tracing::debug!(
                attachment_id = attachment.id,
                "No dimension source for at least one axis; building URL anyway"
            );
        }

        let args = PlaceholderArgs {
            attached_file: decomposed.canonical,
            dimensions,
            attachment_id: attachment.id,
        };

        let builder_name = self.builder_name();
        let builder = match self.registry.get(&builder_name) {
            Ok(builder) => builder,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    builder = %builder_name,
                    "Placeholder builder is not registered"
                );
                return Ok(RedirectDecision::PassThrough(
                    PassThroughReason::UnknownBuilder,
                ));
            }
        };
        let url = builder.build(&args);
        let url = self.hooks.placeholder_url(url, &args);

        Ok(RedirectDecision::RedirectToPlaceholder(url))
    }
}
