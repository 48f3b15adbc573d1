use serde::{Deserialize, Serialize};

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

/// Identifier of an attachment in the host content store.
pub type AttachmentId = i64;

/// Read-only view of one uploaded media file and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct AttachmentRecord {
    pub id: AttachmentId,
    /// Stored path relative to the upload root, e.g. `2013/05/photo.jpg`.
    pub filename: String,
    pub content_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl AttachmentRecord {
    /// Whether the attachment's MIME type belongs to the image family.
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    /// Stored original width; zero and negative values count as absent.
    pub fn original_width(&self) -> Option<u32> {
        self.width.and_then(|w| u32::try_from(w).ok()).filter(|w| *w > 0)
    }

    /// Stored original height; zero and negative values count as absent.
    pub fn original_height(&self) -> Option<u32> {
        self.height.and_then(|h| u32::try_from(h).ok()).filter(|h| *h > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content_type: &str, width: Option<i32>, height: Option<i32>) -> AttachmentRecord {
        AttachmentRecord {
            id: 7,
            filename: "2013/05/photo.jpg".to_string(),
            content_type: content_type.to_string(),
            width,
            height,
        }
    }

    #[test]
    fn test_is_image() {
        assert!(record("image/jpeg", None, None).is_image());
        assert!(record("Image/PNG", None, None).is_image());
        assert!(!record("application/pdf", None, None).is_image());
        assert!(!record("video/mp4", None, None).is_image());
    }

    #[test]
    fn test_original_dimensions_ignore_empty_values() {
        let rec = record("image/png", Some(0), Some(-3));
        assert_eq!(rec.original_width(), None);
        assert_eq!(rec.original_height(), None);

        let rec = record("image/png", Some(640), Some(480));
        assert_eq!(rec.original_width(), Some(640));
        assert_eq!(rec.original_height(), Some(480));
    }
}
