use std::path::PathBuf;
use thiserror::Error;

/// Failures that happen before any request leaves the process
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to read key file {}: {source}", path.display())]
    KeyFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid service account key file: {0}")]
    InvalidKeyFile(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Failed to sign token assertion")]
    Signing,

    #[error("Failed to initialize HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failures reported by, or while talking to, the remote services
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Token exchange failed ({status}): {body}")]
    TokenExchange { status: u16, body: String },

    #[error("Reporting API returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Malformed response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Top-level error for a reporting run
#[derive(Error, Debug)]
pub enum ReportingError {
    #[error("Setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("Remote call failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl ReportingError {
    pub fn is_setup(&self) -> bool {
        matches!(self, ReportingError::Setup(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ReportingError::Remote(_))
    }
}

pub type ReportingResult<T> = Result<T, ReportingError>;
