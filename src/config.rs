use crate::error::{ReportingResult, SetupError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_APPLICATION_NAME: &str = "Hello Analytics Reporting";
pub const DEFAULT_KEY_FILE: &str = "myserviceapp-123456-123456789abc.json";
pub const DEFAULT_VIEW_ID: &str = "123456789";
pub const DEFAULT_ENDPOINT: &str = "https://analyticsreporting.googleapis.com";

/// Settings for a single reporting run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Label sent to the API as the User-Agent
    pub application_name: String,
    /// Service account key downloaded from the Cloud console
    pub key_file_path: PathBuf,
    /// Analytics view the report is scoped to
    pub view_id: String,
    /// Value of the `ga:dimension1` custom dimension to filter on, if any
    pub store_id: Option<String>,
    /// Base URL of the Reporting API
    pub endpoint: String,
    /// Request timeout; the transport default applies when unset
    pub request_timeout_secs: Option<u64>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            key_file_path: PathBuf::from(DEFAULT_KEY_FILE),
            view_id: DEFAULT_VIEW_ID.to_string(),
            store_id: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ReportingConfig {
    pub fn load_from_file(path: &Path) -> ReportingResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SetupError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            SetupError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Location of the per-user config file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("analytics-reporter").join("config.toml"))
    }

    pub fn validate(&self) -> ReportingResult<()> {
        if self.view_id.trim().is_empty() {
            return Err(SetupError::Config("View id cannot be empty".to_string()).into());
        }

        if self.application_name.trim().is_empty() {
            return Err(
                SetupError::Config("Application name cannot be empty".to_string()).into(),
            );
        }

        if self.request_timeout_secs == Some(0) {
            return Err(
                SetupError::Config("Request timeout cannot be zero".to_string()).into(),
            );
        }

        self.endpoint_url()?;
        Ok(())
    }

    /// Parsed endpoint, restricted to absolute http(s) URLs
    pub fn endpoint_url(&self) -> ReportingResult<Url> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            SetupError::Config(format!("Invalid endpoint {}: {}", self.endpoint, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SetupError::Config(format!(
                "Unsupported endpoint scheme: {}",
                other
            ))
            .into()),
        }
    }
}
