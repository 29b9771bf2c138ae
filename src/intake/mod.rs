//! File intake: selection, format classification, preview lifecycle, zoom.
//!
//! [`FileIntake`] owns the current [`SelectedFile`], at most one live
//! [`PreviewHandle`] and the [`ZoomLevel`]. A preview exists exactly when the
//! current selection is a [`FormatClass::Raster`] file; any previous handle is
//! returned to the [`PreviewStore`] before a new one is acquired, and the last
//! one is returned when the intake is dropped.

mod format;
mod preview;
mod zoom;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

pub use format::{
    FormatClass, SelectedFile, GEORASTER_EXTENSIONS, RASTER_EXTENSIONS, UNSUPPORTED_FORMAT_WARNING,
};
pub use preview::{ObjectUrlStore, PreviewHandle, PreviewStore, GEORASTER_PLACEHOLDER};
pub use zoom::ZoomLevel;

/// Errors raised while selecting a file.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The file was selected, but it cannot be previewed or analyzed.
    #[error("Unsupported file format: {name}")]
    UnsupportedFormat { name: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IntakeError {
    /// The message to show the operator.
    pub fn user_message(&self) -> String {
        match self {
            IntakeError::UnsupportedFormat { .. } => UNSUPPORTED_FORMAT_WARNING.to_string(),
            other => other.to_string(),
        }
    }
}

/// Selection state for one operator session.
pub struct FileIntake {
    store: Arc<dyn PreviewStore>,
    selected: Option<SelectedFile>,
    preview: Option<PreviewHandle>,
    zoom: ZoomLevel,
}

impl FileIntake {
    pub fn new(store: Arc<dyn PreviewStore>) -> Self {
        Self {
            store,
            selected: None,
            preview: None,
            zoom: ZoomLevel::default(),
        }
    }

    /// Replace the current selection.
    ///
    /// The zoom is reset and the preview slot is rebuilt for the new format.
    /// An unsupported file is still selected (without a preview); the returned
    /// error carries the warning the operator should see.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<&SelectedFile, IntakeError> {
        self.release_preview();
        self.zoom = ZoomLevel::default();

        let format = file.format();
        debug!(
            "Selected {} ({} bytes, {})",
            file.name(),
            file.len(),
            format.as_str()
        );

        if format.has_preview() {
            self.preview = Some(self.store.acquire(&file));
        }

        let name = file.name().to_string();
        let selected = self.selected.insert(file);

        if format == FormatClass::Unsupported {
            warn!("Unsupported file format selected: {}", name);
            return Err(IntakeError::UnsupportedFormat { name });
        }

        Ok(selected)
    }

    /// Read a file from disk and select it.
    pub async fn select_path(&mut self, path: &Path) -> Result<&SelectedFile, IntakeError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| IntakeError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.select_file(SelectedFile::new(name, bytes))
    }

    /// Release the live preview, if any. Safe to call repeatedly.
    pub fn release_preview(&mut self) {
        if let Some(handle) = self.preview.take() {
            self.store.revoke(handle);
        }
    }

    /// Drop the selection and its preview.
    pub fn clear(&mut self) {
        self.release_preview();
        self.selected = None;
        self.zoom = ZoomLevel::default();
    }

    /// Change the zoom by `delta`. Does nothing without a preview.
    pub fn adjust_zoom(&mut self, delta: f64) -> ZoomLevel {
        if self.preview.is_some() {
            self.zoom = self.zoom.adjusted(delta);
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> ZoomLevel {
        self.adjust_zoom(ZoomLevel::STEP)
    }

    pub fn zoom_out(&mut self) -> ZoomLevel {
        self.adjust_zoom(-ZoomLevel::STEP)
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    /// Placeholder text when the selection is a GeoTIFF.
    pub fn geo_placeholder(&self) -> Option<&'static str> {
        match self.selected.as_ref().map(SelectedFile::format) {
            Some(FormatClass::GeoRaster) => Some(GEORASTER_PLACEHOLDER),
            _ => None,
        }
    }
}

impl Drop for FileIntake {
    fn drop(&mut self) {
        self.release_preview();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts acquire/revoke calls and tracks the live maximum.
    #[derive(Default)]
    struct CountingStore {
        acquired: AtomicUsize,
        revoked: AtomicUsize,
        max_live: AtomicUsize,
    }

    impl CountingStore {
        fn live(&self) -> usize {
            self.acquired.load(Ordering::SeqCst) - self.revoked.load(Ordering::SeqCst)
        }
    }

    impl PreviewStore for CountingStore {
        fn acquire(&self, file: &SelectedFile) -> PreviewHandle {
            let n = self.acquired.fetch_add(1, Ordering::SeqCst);
            self.max_live.fetch_max(self.live(), Ordering::SeqCst);
            PreviewHandle::new(format!("test:{}:{}", n, file.name()))
        }

        fn revoke(&self, _handle: PreviewHandle) {
            self.revoked.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn intake() -> (FileIntake, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        (FileIntake::new(store.clone()), store)
    }

    #[test]
    fn test_raster_selection_acquires_preview() {
        let (mut intake, store) = intake();
        let selected = intake.select_file(SelectedFile::new("ship.png", vec![1u8])).unwrap();
        assert_eq!(selected.format(), FormatClass::Raster);
        assert!(intake.preview().is_some());
        assert_eq!(store.live(), 1);
    }

    #[test]
    fn test_at_most_one_live_preview() {
        let (mut intake, store) = intake();
        for name in ["a.png", "b.jpg", "c.JPEG", "d.png"] {
            intake.select_file(SelectedFile::new(name, vec![0u8])).unwrap();
            assert_eq!(store.live(), 1);
        }
        assert_eq!(store.acquired.load(Ordering::SeqCst), 4);
        assert_eq!(store.revoked.load(Ordering::SeqCst), 3);
        assert_eq!(store.max_live.load(Ordering::SeqCst), 1);

        drop(intake);
        assert_eq!(store.live(), 0);
        assert_eq!(store.revoked.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_non_raster_selection_clears_preview() {
        let (mut intake, store) = intake();
        intake.select_file(SelectedFile::new("a.png", vec![0u8])).unwrap();

        let selected = intake.select_file(SelectedFile::new("scan.geotiff", vec![0u8])).unwrap();
        assert_eq!(selected.format(), FormatClass::GeoRaster);
        assert!(intake.preview().is_none());
        assert_eq!(intake.geo_placeholder(), Some(GEORASTER_PLACEHOLDER));
        assert_eq!(store.live(), 0);

        intake.select_file(SelectedFile::new("b.png", vec![0u8])).unwrap();
        assert_eq!(intake.geo_placeholder(), None);
        assert_eq!(store.live(), 1);
    }

    #[test]
    fn test_unsupported_selection_warns_but_selects() {
        let (mut intake, store) = intake();
        intake.select_file(SelectedFile::new("a.png", vec![0u8])).unwrap();

        let err = intake
            .select_file(SelectedFile::new("notes.txt", vec![0u8]))
            .unwrap_err();
        assert!(matches!(err, IntakeError::UnsupportedFormat { ref name } if name == "notes.txt"));
        assert_eq!(err.user_message(), UNSUPPORTED_FORMAT_WARNING);
        assert_eq!(intake.selected().map(SelectedFile::name), Some("notes.txt"));
        assert!(intake.preview().is_none());
        assert_eq!(store.live(), 0);
    }

    #[test]
    fn test_release_preview_is_idempotent() {
        let (mut intake, store) = intake();
        intake.select_file(SelectedFile::new("a.png", vec![0u8])).unwrap();
        intake.release_preview();
        intake.release_preview();
        drop(intake);
        assert_eq!(store.revoked.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zoom_requires_preview_and_resets_on_selection() {
        let (mut intake, _store) = intake();
        assert_eq!(intake.zoom_in(), ZoomLevel::default());

        intake.select_file(SelectedFile::new("a.png", vec![0u8])).unwrap();
        intake.zoom_in();
        intake.zoom_in();
        assert_eq!(intake.zoom().factor(), 1.2);

        for _ in 0..40 {
            intake.zoom_in();
        }
        assert_eq!(intake.zoom().factor(), 3.0);

        intake.select_file(SelectedFile::new("b.png", vec![0u8])).unwrap();
        assert_eq!(intake.zoom(), ZoomLevel::default());

        for _ in 0..40 {
            intake.zoom_out();
        }
        assert_eq!(intake.zoom().factor(), 0.5);
    }

    #[test]
    fn test_clear_releases_everything() {
        let (mut intake, store) = intake();
        intake.select_file(SelectedFile::new("a.png", vec![0u8])).unwrap();
        intake.clear();
        assert!(intake.selected().is_none());
        assert_eq!(store.live(), 0);
    }

    #[tokio::test]
    async fn test_select_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frigate.jpg");
        std::fs::write(&path, b"jpegdata").unwrap();

        let (mut intake, store) = intake();
        let selected = intake.select_path(&path).await.unwrap();
        assert_eq!(selected.name(), "frigate.jpg");
        assert_eq!(selected.bytes().as_ref(), b"jpegdata");
        assert_eq!(store.live(), 1);

        let missing = dir.path().join("missing.png");
        let err = intake.select_path(&missing).await.unwrap_err();
        assert!(matches!(err, IntakeError::Read { .. }));
        // A failed read leaves the previous selection intact
        assert_eq!(intake.selected().map(SelectedFile::name), Some("frigate.jpg"));
    }
}
