//! Application state shared by every handler.

use fauxmedia_core::{AttachmentStore, CatalogHandle, Config, PlaceholderResolver};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub resolver: PlaceholderResolver,
    pub catalog: Arc<CatalogHandle>,
}

impl AppState {
    pub fn store(&self) -> &Arc<dyn AttachmentStore> {
        self.resolver.store()
    }
}
