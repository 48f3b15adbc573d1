//! Extension points of the placeholder pipeline
//!
//! Deployments that need to steer the pipeline per request (pick a builder by tenant,
//! send some attachments to a different origin, append tracking parameters) implement
//! `PlaceholderHooks`. Every method receives the configured value and returns the one
//! to use; the defaults return it unchanged.

use crate::builders::PlaceholderArgs;
use crate::models::AttachmentId;

pub trait PlaceholderHooks: Send + Sync {
    /// Name of the builder to use for this request.
    fn builder_name(&self, configured: &str) -> String {
        configured.to_string()
    }

    /// Host that should serve this attachment instead of a placeholder.
    fn redirect_server(
        &self,
        configured: Option<&str>,
        _attachment_id: AttachmentId,
    ) -> Option<String> {
        configured.map(str::to_string)
    }

    /// Final rewrite of a built placeholder URL.
    fn placeholder_url(&self, url: String, _args: &PlaceholderArgs) -> String {
        url
    }

    /// Whether server-side redirects are disabled in favour of the client fallback.
    fn offline_mode(&self, configured: bool) -> bool {
        configured
    }
}

/// Hooks that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHooks;

impl PlaceholderHooks for NoOpHooks {}
