//! Attachment store abstraction
//!
//! The pipeline only reads attachment metadata; the store that owns it (the host CMS
//! database in production, a map in tests) sits behind this trait.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::AttachmentRecord;

#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Exact-match lookup on the stored relative filename.
    ///
    /// The filename is unique by convention; if several rows match, any one is returned.
    async fn find_by_filename(&self, filename: &str) -> Result<Option<AttachmentRecord>, AppError>;

    /// Every image attachment, for catalog generation.
    async fn list_images(&self) -> Result<Vec<AttachmentRecord>, AppError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Map-backed store for tests and local experiments.
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct InMemoryAttachmentStore {
        records: Arc<Mutex<BTreeMap<String, AttachmentRecord>>>,
        lookups: Arc<Mutex<Vec<String>>>,
    }

    impl InMemoryAttachmentStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, record: AttachmentRecord) {
            self.records
                .lock()
                .unwrap()
                .insert(record.filename.clone(), record);
        }

        /// Convenience for the common case of an image with optional stored size.
        pub fn add_image(
            &self,
            id: i64,
            filename: &str,
            width: Option<i32>,
            height: Option<i32>,
        ) {
            self.insert(AttachmentRecord {
                id,
                filename: filename.to_string(),
                content_type: "image/jpeg".to_string(),
                width,
                height,
            });
        }

        /// Filenames passed to `find_by_filename`, in call order.
        pub fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AttachmentStore for InMemoryAttachmentStore {
        async fn find_by_filename(
            &self,
            filename: &str,
        ) -> Result<Option<AttachmentRecord>, AppError> {
            self.lookups.lock().unwrap().push(filename.to_string());
            Ok(self.records.lock().unwrap().get(filename).cloned())
        }

        async fn list_images(&self) -> Result<Vec<AttachmentRecord>, AppError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.is_image())
                .cloned()
                .collect())
        }
    }
}
