//! Transport to the remote analysis service.
//!
//! The session talks to the service through the [`AnalysisUploader`] trait so
//! the request lifecycle can be exercised without a network. [`HttpUploader`]
//! is the production implementation: one multipart `POST` per call.

mod http;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::intake::SelectedFile;

pub use http::HttpUploader;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying the label-set context.
pub const CONTEXT_FIELD: &str = "context";

/// Upload failures. These are logged, never shown to the operator.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Response (HTTP {status}) is not JSON: {source}")]
    InvalidJson {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Sends a file to the analysis service and returns the raw result document.
#[async_trait]
pub trait AnalysisUploader: Send + Sync {
    async fn upload(&self, file: &SelectedFile) -> Result<Value, UploadError>;
}
