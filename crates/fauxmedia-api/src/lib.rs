//! Fauxmedia API Library
//!
//! HTTP handlers, error rendering and application setup for the placeholder service.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
