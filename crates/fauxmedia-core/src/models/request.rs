use percent_encoding::percent_decode_str;

/// An incoming request for something under (possibly) the upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Request target exactly as received: path plus optional `?query`.
    pub request_uri: String,
    pub host: Option<String>,
    /// Whether the original request arrived over HTTPS.
    pub secure: bool,
}

impl UploadRequest {
    pub fn new(request_uri: impl Into<String>, host: Option<String>, secure: bool) -> Self {
        Self {
            request_uri: request_uri.into(),
            host,
            secure,
        }
    }

    /// Path component of the request target (query and fragment removed).
    pub fn path(&self) -> &str {
        self.request_uri
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
    }

    /// Path relative to the upload root, percent-decoded.
    ///
    /// The prefix match is case-sensitive and segment-aware: `/uploads-old/a.jpg` is not
    /// under `/uploads`. Returns `None` when the request is outside the root or names the
    /// root itself.
    pub fn relative_upload_path(&self, base_path: &str) -> Option<String> {
        let path = self.path();
        let base = base_path.trim_end_matches('/');

        let rest = if base.is_empty() {
            path.strip_prefix('/')?
        } else {
            path.strip_prefix(base)?.strip_prefix('/')?
        };

        if rest.is_empty() {
            return None;
        }

        let decoded = percent_decode_str(rest)
            .decode_utf8()
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| rest.to_string());
        Some(decoded)
    }

    /// Same path and query on another host, with the scheme of the original request.
    pub fn on_server(&self, server: &str) -> String {
        let scheme = if self.secure { "https://" } else { "http://" };
        format!("{}{}{}", scheme, server, self.request_uri)
    }
}
