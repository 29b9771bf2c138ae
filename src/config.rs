//! Configuration management for IMInsight using the prefer crate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::analysis::ProgressConfig;

/// Default analysis service location (the service's development port).
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Path of the upload endpoint on the analysis service.
pub const DEFAULT_UPLOAD_PATH: &str = "/upload";

/// Label-set contexts understood by the analysis service.
pub const KNOWN_CONTEXTS: &[&str] = &["ground", "naval", "aerial"];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the analysis service.
    pub server_url: String,
    /// Path of the upload endpoint, joined onto `server_url`.
    pub upload_path: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Label-set context sent with each upload (None = service default).
    pub context: Option<String>,
    /// Simulated progress while an upload is outstanding.
    pub progress: ProgressConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            request_timeout: 60,
            user_agent: format!("IMInsight/{}", env!("CARGO_PKG_VERSION")),
            context: None,
            progress: ProgressConfig::default(),
        }
    }
}

impl Settings {
    /// Create settings pointing at a specific service.
    pub fn with_server_url(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Default::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the analysis service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    /// Upload endpoint path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_path: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Label-set context: "ground", "naval" or "aerial".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Progress increment per tick (percent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_step: Option<u8>,
    /// Milliseconds between progress ticks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_interval_ms: Option<u64>,

    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers iminsight config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("iminsight").await {
            Ok(pref_config) => {
                let server_url: Option<String> = pref_config.get("server_url").ok();
                let upload_path: Option<String> = pref_config.get("upload_path").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let context: Option<String> = pref_config.get("context").ok();
                let progress_step: Option<u8> = pref_config.get("progress_step").ok();
                let progress_interval_ms: Option<u64> =
                    pref_config.get("progress_interval_ms").ok();

                let source_path = pref_config.source_path().cloned();

                Config {
                    server_url,
                    upload_path,
                    request_timeout,
                    user_agent,
                    context,
                    progress_step,
                    progress_interval_ms,
                    source_path,
                }
            }
            Err(_) => {
                // No config file found, use defaults
                Self::default()
            }
        }
    }

    /// Load configuration from a specific JSON file.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref url) = self.server_url {
            settings.server_url = url.clone();
        }
        if let Some(ref path) = self.upload_path {
            settings.upload_path = path.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(ref context) = self.context {
            if !KNOWN_CONTEXTS.contains(&context.as_str()) {
                tracing::warn!(
                    "Unknown analysis context '{}'; the service will fall back to its default",
                    context
                );
            }
            settings.context = Some(context.clone());
        }
        if let Some(step) = self.progress_step {
            settings.progress.step = step;
        }
        if let Some(interval) = self.progress_interval_ms {
            settings.progress.interval = Duration::from_millis(interval);
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Override the service URL (--server flag / IMINSIGHT_SERVER_URL).
    pub server_url: Option<String>,
    /// Override the label-set context (--context flag).
    pub context: Option<String>,
}

/// Load settings with explicit options.
pub async fn load_settings_with_options(options: LoadOptions) -> Result<Settings, ConfigError> {
    // An explicit path must load; auto-discovery silently falls back to defaults
    let config = match &options.config_path {
        Some(path) => {
            let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
            Config::load_from_path(Path::new(&expanded)).await?
        }
        None => Config::load().await,
    };

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);

    if let Some(url) = options.server_url {
        settings.server_url = url;
    }
    if let Some(context) = options.context {
        settings.context = Some(context);
    }

    Ok(settings)
}
