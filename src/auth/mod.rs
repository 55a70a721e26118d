pub mod service_account;
pub mod token;

pub use service_account::{ServiceAccountCredential, ServiceAccountKey};
pub use token::{AccessToken, TokenResponse};

/// OAuth2 scopes understood by the Analytics Reporting API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportingScope {
    Analytics,
    AnalyticsReadonly,
}

impl ReportingScope {
    pub fn as_str(&self) -> &str {
        match self {
            ReportingScope::Analytics => "https://www.googleapis.com/auth/analytics",
            ReportingScope::AnalyticsReadonly => {
                "https://www.googleapis.com/auth/analytics.readonly"
            }
        }
    }

    /// Every scope the Reporting API accepts
    pub fn all() -> Vec<ReportingScope> {
        vec![ReportingScope::Analytics, ReportingScope::AnalyticsReadonly]
    }

    /// Space separated form used in token requests
    pub fn join(scopes: &[ReportingScope]) -> String {
        scopes
            .iter()
            .map(ReportingScope::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
