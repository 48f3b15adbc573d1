//! Offline-mode dimension catalog
//!
//! In offline mode the server stops redirecting and the browser substitutes broken
//! images itself. To size those substitutes it needs the original dimensions of every
//! image attachment, published as a small script. The catalog is generated once,
//! published as an immutable snapshot and swapped wholesale on regeneration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::filename::decompose;
use crate::models::AttachmentRecord;
use crate::store::AttachmentStore;

/// Path the catalog script is served from.
pub const CATALOG_SCRIPT_PATH: &str = "/media-placeholders/catalog.js";
/// Global the script assigns the catalog to.
pub const CATALOG_GLOBAL: &str = "window.MediaPlaceholders";
/// Size the client fallback uses when nothing else is known.
pub const CLIENT_DEFAULT_DIMENSION: u32 = 200;

const VERSION_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub width: u32,
    pub height: u32,
}

#[derive(Serialize)]
struct CatalogBody<'a> {
    #[serde(rename = "baseURL")]
    base_url: &'a str,
    catalog: &'a BTreeMap<String, CatalogEntry>,
}

/// One published, immutable generation of the catalog.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    base_url: String,
    entries: BTreeMap<String, CatalogEntry>,
    body: String,
    version: String,
    generated_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(
        base_url: impl Into<String>,
        entries: BTreeMap<String, CatalogEntry>,
    ) -> Result<Self, AppError> {
        let base_url = base_url.into();
        let body = serde_json::to_string(&CatalogBody {
            base_url: &base_url,
            catalog: &entries,
        })?;
        let digest = hex::encode(Sha256::digest(body.as_bytes()));
        Ok(Self {
            base_url,
            entries,
            version: digest[..VERSION_LEN].to_string(),
            body,
            generated_at: Utc::now(),
        })
    }

    pub fn empty(base_url: impl Into<String>) -> Result<Self, AppError> {
        Self::new(base_url, BTreeMap::new())
    }

    /// Build from attachment records; only images with both stored dimensions are kept.
    pub fn from_attachments(
        base_url: impl Into<String>,
        records: impl IntoIterator<Item = AttachmentRecord>,
    ) -> Result<Self, AppError> {
        let entries = records
            .into_iter()
            .filter(|r| r.is_image())
            .filter_map(|r| {
                let entry = CatalogEntry {
                    width: r.original_width()?,
                    height: r.original_height()?,
                };
                Some((r.filename, entry))
            })
            .collect();
        Self::new(base_url, entries)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Content hash of the serialized catalog; changes whenever the catalog does.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, filename: &str) -> Option<CatalogEntry> {
        self.entries.get(filename).copied()
    }

    /// JSON body `{"baseURL": ..., "catalog": {...}}`.
    pub fn json(&self) -> &str {
        &self.body
    }

    /// Script assigning the catalog to the client-side global.
    pub fn script(&self) -> String {
        format!("{} = {};\n", CATALOG_GLOBAL, self.body)
    }

    /// Cache-busted URL of the catalog script.
    pub fn script_url(&self) -> String {
        format!("{}?ver={}", CATALOG_SCRIPT_PATH, self.version)
    }

    /// Catalog entry for an image URL, compared protocol-relative against `baseURL/<key>`.
    ///
    /// A bare-path `baseURL` is compared against the path of `src` only.
    pub fn lookup_src(&self, src: &str) -> Option<CatalogEntry> {
        let src = src
            .strip_prefix("https:")
            .or_else(|| src.strip_prefix("http:"))
            .unwrap_or(src);
        let src = match src.strip_prefix("//") {
            Some(rest) if !self.base_url.starts_with("//") => {
                rest.find('/').map_or("", |idx| &rest[idx..])
            }
            _ => src,
        };
        let relative = src.strip_prefix(self.base_url.as_str())?.strip_prefix('/')?;
        self.get(relative)
    }

    /// Dimensions the client fallback should use for a failing image.
    ///
    /// Order: filename suffix, catalog entry, then the element's own attribute values,
    /// falling back to [`CLIENT_DEFAULT_DIMENSION`].
    pub fn client_dimensions(
        &self,
        src: &str,
        element_width: Option<&str>,
        element_height: Option<&str>,
    ) -> ClientDimensions {
        let path = src.split(['?', '#']).next().unwrap_or_default();
        let decomposed = decompose(path);
        if let (Some(width), Some(height)) = (decomposed.width, decomposed.height) {
            return ClientDimensions::known(width, height);
        }
        if let Some(entry) = self.lookup_src(path) {
            return ClientDimensions::known(entry.width, entry.height);
        }
        ClientDimensions {
            width: ClientDimension::from_attribute(element_width),
            height: ClientDimension::from_attribute(element_height),
            known: false,
        }
    }
}

/// One axis of a client-side placeholder: pixels, or a percentage kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClientDimension {
    Pixels(u32),
    Relative(String),
}

impl ClientDimension {
    fn from_attribute(value: Option<&str>) -> Self {
        let value = value.map(str::trim).unwrap_or_default();
        if value.ends_with('%') && value.len() > 1 {
            return ClientDimension::Relative(value.to_string());
        }
        let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u32>() {
            Ok(px) if px > 0 => ClientDimension::Pixels(px),
            _ => ClientDimension::Pixels(CLIENT_DEFAULT_DIMENSION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientDimensions {
    pub width: ClientDimension,
    pub height: ClientDimension,
    /// Whether the size came from the upload itself rather than the element.
    pub known: bool,
}

impl ClientDimensions {
    fn known(width: u32, height: u32) -> Self {
        Self {
            width: ClientDimension::Pixels(width),
            height: ClientDimension::Pixels(height),
            known: true,
        }
    }
}

/// Holder of the currently published catalog snapshot.
///
/// Readers clone the `Arc` and never observe a partially built catalog.
pub struct CatalogHandle {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl CatalogHandle {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub async fn current(&self) -> Arc<CatalogSnapshot> {
        self.current.read().await.clone()
    }

    /// Replace the published snapshot.
    pub async fn publish(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self.current.write().await = snapshot.clone();
        snapshot
    }

    /// Rebuild from the store and publish the result.
    #[tracing::instrument(skip(self, store))]
    pub async fn regenerate(
        &self,
        store: &dyn AttachmentStore,
        base_url: &str,
    ) -> Result<Arc<CatalogSnapshot>, AppError> {
        let records = store.list_images().await?;
        let snapshot = CatalogSnapshot::from_attachments(base_url, records)?;
        tracing::info!(
            entries = snapshot.len(),
            version = %snapshot.version(),
            "Published media placeholder catalog"
        );
        Ok(self.publish(snapshot).await)
    }
}
