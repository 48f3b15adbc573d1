//! HTTP handlers

pub mod catalog;
pub mod missing_upload;
