//! Fauxmedia database layer
//!
//! Read-only access to the attachment table owned by the host content store.

pub mod db;

pub use db::AttachmentRepository;
