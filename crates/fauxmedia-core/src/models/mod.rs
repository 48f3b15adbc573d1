//! Domain models for the placeholder pipeline
//!
//! Attachments are owned by the host content store and only read here; requests and
//! decisions live for a single request-response cycle.

pub mod attachment;
pub mod decision;
pub mod request;

pub use attachment::{AttachmentId, AttachmentRecord};
pub use decision::{PassThroughReason, RedirectDecision};
pub use request::UploadRequest;
