//! Database repositories
//
// Attachment metadata (read-only)
pub mod attachment;

pub use attachment::AttachmentRepository;
