//! One operator's workspace: a file intake paired with an analysis session.

use std::path::Path;
use std::sync::Arc;

use crate::config::Settings;
use crate::intake::{
    FileIntake, IntakeError, ObjectUrlStore, PreviewHandle, PreviewStore, SelectedFile, ZoomLevel,
};
use crate::upload::{AnalysisUploader, HttpUploader, UploadError};

use super::analysis::{AnalysisEvent, AnalysisSession, ProgressConfig, SubmitOutcome};

/// Everything one operator works with. Nothing here is shared with other
/// sessions; dropping the session releases its preview.
pub struct OperatorSession {
    intake: FileIntake,
    analysis: AnalysisSession,
}

impl OperatorSession {
    pub fn new(
        uploader: Arc<dyn AnalysisUploader>,
        previews: Arc<dyn PreviewStore>,
        progress: ProgressConfig,
    ) -> Self {
        Self {
            intake: FileIntake::new(previews),
            analysis: AnalysisSession::new(uploader, progress),
        }
    }

    /// Session talking HTTP to the configured service, with in-memory previews.
    pub fn from_settings(settings: &Settings) -> Result<Self, UploadError> {
        let uploader = HttpUploader::new(settings)?;
        Ok(Self::new(
            Arc::new(uploader),
            Arc::new(ObjectUrlStore::new()),
            settings.progress.clone(),
        ))
    }

    pub fn subscribe(&mut self) -> tokio::sync::mpsc::UnboundedReceiver<AnalysisEvent> {
        self.analysis.subscribe()
    }

    /// Select a file, clearing any settled result first.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<&SelectedFile, IntakeError> {
        self.analysis.dismiss();
        self.intake.select_file(file)
    }

    /// Read and select a file from disk. The settled result is cleared only
    /// once the file has been read; a failed read changes nothing.
    pub async fn select_path(&mut self, path: &Path) -> Result<&SelectedFile, IntakeError> {
        let selected = self.intake.select_path(path).await;
        if !matches!(selected, Err(IntakeError::Read { .. })) {
            self.analysis.dismiss();
        }
        selected
    }

    pub fn release_preview(&mut self) {
        self.intake.release_preview();
    }

    pub fn adjust_zoom(&mut self, delta: f64) -> ZoomLevel {
        self.intake.adjust_zoom(delta)
    }

    /// Analyze the current selection.
    pub async fn submit(&self) -> SubmitOutcome {
        self.analysis.submit(self.intake.selected().cloned()).await
    }

    pub fn dismiss(&self) -> bool {
        self.analysis.dismiss()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.intake.selected()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.intake.preview()
    }

    pub fn intake(&self) -> &FileIntake {
        &self.intake
    }

    pub fn intake_mut(&mut self) -> &mut FileIntake {
        &mut self.intake
    }

    pub fn analysis(&self) -> &AnalysisSession {
        &self.analysis
    }
}
