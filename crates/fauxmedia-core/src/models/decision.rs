use serde::Serialize;

/// Why the pipeline declined to redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassThroughReason {
    OutsideUploadRoot,
    OfflineMode,
    AttachmentNotFound,
    NotAnImage,
    /// The selected builder is not registered; logged as a configuration warning.
    UnknownBuilder,
}

impl PassThroughReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PassThroughReason::OutsideUploadRoot => "outside_upload_root",
            PassThroughReason::OfflineMode => "offline_mode",
            PassThroughReason::AttachmentNotFound => "attachment_not_found",
            PassThroughReason::NotAnImage => "not_an_image",
            PassThroughReason::UnknownBuilder => "unknown_builder",
        }
    }
}

/// Terminal output of the pipeline for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Leave the request alone; the host's own response stands.
    PassThrough(PassThroughReason),
    /// Send the whole request to another origin, path and query preserved.
    RedirectToServer(String),
    /// Send the browser to a placeholder-service image.
    RedirectToPlaceholder(String),
}

impl RedirectDecision {
    /// Redirect target, if this decision redirects.
    pub fn location(&self) -> Option<&str> {
        match self {
            RedirectDecision::PassThrough(_) => None,
            RedirectDecision::RedirectToServer(url) | RedirectDecision::RedirectToPlaceholder(url) => {
                Some(url)
            }
        }
    }
}
