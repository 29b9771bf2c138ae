//! Preview handles: revocable references to a displayable rendering.
//!
//! A handle is minted by a [`PreviewStore`] for a raster selection and must be
//! given back to the same store exactly once. Handles are not `Clone` and
//! [`PreviewStore::revoke`] takes the handle by value, so a handle can only
//! be released once.

use std::collections::HashMap;
use std::sync::Mutex;

use bytes::Bytes;
use tracing::debug;

use super::format::SelectedFile;

/// Placeholder shown in place of a GeoTIFF rendering.
pub const GEORASTER_PLACEHOLDER: &str = "GeoTIFF preview would render here.";

/// A live preview reference, e.g. `blob:iminsight/<uuid>`.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    url: String,
}

impl PreviewHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Issues and revokes preview handles.
pub trait PreviewStore: Send + Sync {
    /// Register a rendering of `file` and return its handle.
    fn acquire(&self, file: &SelectedFile) -> PreviewHandle;

    /// Release a handle previously returned by [`acquire`](Self::acquire).
    fn revoke(&self, handle: PreviewHandle);
}

/// In-memory object-URL registry.
#[derive(Debug, Default)]
pub struct ObjectUrlStore {
    entries: Mutex<HashMap<String, Bytes>>,
}

impl ObjectUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the payload behind a live URL.
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(url).cloned())
    }

    /// Number of URLs currently registered.
    pub fn live_count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl PreviewStore for ObjectUrlStore {
    fn acquire(&self, file: &SelectedFile) -> PreviewHandle {
        let url = format!("blob:iminsight/{}", uuid::Uuid::new_v4());
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(url.clone(), file.bytes().clone());
        }
        debug!("Created preview {} for {}", url, file.name());
        PreviewHandle::new(url)
    }

    fn revoke(&self, handle: PreviewHandle) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(handle.url());
        }
        debug!("Revoked preview {}", handle.url());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_roundtrip() {
        let store = ObjectUrlStore::new();
        let file = SelectedFile::new("a.png", vec![9u8, 8, 7]);

        let handle = store.acquire(&file);
        assert!(handle.url().starts_with("blob:iminsight/"));
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.resolve(handle.url()).as_deref(), Some(&[9u8, 8, 7][..]));

        let url = handle.url().to_string();
        store.revoke(handle);
        assert_eq!(store.live_count(), 0);
        assert!(store.resolve(&url).is_none());
    }

    #[test]
    fn test_handles_are_unique() {
        let store = ObjectUrlStore::new();
        let file = SelectedFile::new("a.png", vec![1u8]);
        let first = store.acquire(&file);
        let second = store.acquire(&file);
        assert_ne!(first, second);
        store.revoke(first);
        store.revoke(second);
        assert_eq!(store.live_count(), 0);
    }
}
