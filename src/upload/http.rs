//! reqwest-backed uploader.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{AnalysisUploader, UploadError, CONTEXT_FIELD, FILE_FIELD};
use crate::config::Settings;
use crate::intake::SelectedFile;

/// Posts files to `{server_url}{upload_path}` as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: Client,
    endpoint: Url,
    context: Option<String>,
}

impl HttpUploader {
    pub fn new(settings: &Settings) -> Result<Self, UploadError> {
        let endpoint = Url::parse(&settings.server_url)?.join(&settings.upload_path)?;

        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.request_timeout())
            .build()
            .map_err(UploadError::Client)?;

        Ok(Self {
            client,
            endpoint,
            context: settings.context.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn form(&self, file: &SelectedFile) -> Result<Form, UploadError> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(&file.mime_type())?;

        let mut form = Form::new().part(FILE_FIELD, part);
        if let Some(ref context) = self.context {
            form = form.text(CONTEXT_FIELD, context.clone());
        }
        Ok(form)
    }
}

#[async_trait]
impl AnalysisUploader for HttpUploader {
    async fn upload(&self, file: &SelectedFile) -> Result<Value, UploadError> {
        debug!("POST {} ({}, {} bytes)", self.endpoint, file.name(), file.len());

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(self.form(file)?)
            .send()
            .await?;

        // The service reports its own failures as JSON with an error status,
        // so the status code is not treated as a failure here.
        let status = response.status();
        let body = response.bytes().await?;
        debug!("Upload answered HTTP {} ({} bytes)", status, body.len());

        serde_json::from_slice(&body).map_err(|source| UploadError::InvalidJson {
            status: status.as_u16(),
            source,
        })
    }
}
