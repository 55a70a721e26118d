pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod reporting;

pub use config::ReportingConfig;
pub use error::{RemoteError, ReportingError, ReportingResult, SetupError};
pub use render::ReportRenderer;
