use crate::config::ReportingConfig;
use crate::error::ReportingResult;
use clap::Parser;
use std::path::PathBuf;

/// analytics-reporter - print the "Add to Order" event labels of a Google Analytics view
#[derive(Parser, Debug, Default)]
#[command(name = "analytics-reporter")]
#[command(about = "Query the Google Analytics Reporting API v4 and print the result")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Service account key file
    #[arg(long)]
    pub key_file: Option<PathBuf>,

    /// Analytics view id to query
    #[arg(long)]
    pub view_id: Option<String>,

    /// Application name sent with each request
    #[arg(long)]
    pub application_name: Option<String>,

    /// Only count events tagged with this store id (custom dimension 1)
    #[arg(long)]
    pub store_id: Option<String>,

    /// Reporting API base URL
    #[arg(long)]
    pub endpoint: Option<String>,
}

impl Cli {
    /// Defaults, then the config file, then flags
    pub fn resolve_config(&self) -> ReportingResult<ReportingConfig> {
        let mut config = match &self.config {
            Some(path) => ReportingConfig::load_from_file(path)?,
            None => match ReportingConfig::default_path().filter(|path| path.exists()) {
                Some(path) => {
                    tracing::debug!("Using config file {}", path.display());
                    ReportingConfig::load_from_file(&path)?
                }
                None => ReportingConfig::default(),
            },
        };

        if let Some(key_file) = &self.key_file {
            config.key_file_path = key_file.clone();
        }
        if let Some(view_id) = &self.view_id {
            config.view_id = view_id.clone();
        }
        if let Some(application_name) = &self.application_name {
            config.application_name = application_name.clone();
        }
        if let Some(store_id) = &self.store_id {
            config.store_id = Some(store_id.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
