//! Fauxmedia Core Library
//!
//! Domain models, configuration, error types and the missing-upload resolution pipeline
//! shared by the database layer and the HTTP service.

pub mod builders;
pub mod catalog;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod filename;
pub mod hooks;
pub mod models;
pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use builders::{BuilderRegistry, BuiltinBuilder, PlaceholderArgs, PlaceholderUrlBuilder};
pub use catalog::{CatalogHandle, CatalogSnapshot, ClientDimensions};
pub use config::{upload_base_protocol_relative, BaseConfig, Config, PlaceholderConfig};
pub use dimensions::{DimensionSources, ResolvedDimensions};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use filename::{decompose, DecomposedFilename};
pub use hooks::{NoOpHooks, PlaceholderHooks};
pub use models::{AttachmentId, AttachmentRecord, PassThroughReason, RedirectDecision, UploadRequest};
pub use resolver::{PlaceholderResolver, ResolverSettings};
pub use store::AttachmentStore;
