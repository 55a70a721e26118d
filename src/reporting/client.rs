use crate::auth::{AccessToken, ServiceAccountCredential};
use crate::config::ReportingConfig;
use crate::error::{RemoteError, ReportingResult, SetupError};
use crate::reporting::model::{GetReportsRequest, GetReportsResponse};
use crate::reporting::ReportsService;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Duration;

const BATCH_GET_PATH: &str = "v4/reports:batchGet";
const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

/// Error envelope returned by Google APIs on failure
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    status: Option<String>,
}

/// Authorized client for the Analytics Reporting API v4
pub struct AnalyticsReportingClient {
    http_client: HttpClient,
    batch_get_url: String,
    application_name: String,
    credential: ServiceAccountCredential,
    cached_token: Mutex<Option<AccessToken>>,
}

impl AnalyticsReportingClient {
    /// Build the transport. Fails only on local setup problems.
    pub fn new(config: &ReportingConfig, credential: ServiceAccountCredential) -> ReportingResult<Self> {
        let endpoint = config.endpoint_url()?;

        let mut builder = HttpClient::builder().user_agent(&config.application_name);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(SetupError::Transport)?;

        let batch_get_url = format!(
            "{}/{}",
            endpoint.as_str().trim_end_matches('/'),
            BATCH_GET_PATH
        );

        Ok(Self {
            http_client,
            batch_get_url,
            application_name: config.application_name.clone(),
            credential,
            cached_token: Mutex::new(None),
        })
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// Cached token, or a new one when missing or about to expire
    async fn valid_access_token(&self) -> ReportingResult<AccessToken> {
        let mut cached = self.cached_token.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.needs_refresh(TOKEN_REFRESH_BUFFER_MINUTES) {
                return Ok(token.clone());
            }
            tracing::debug!("Cached access token is about to expire");
        }

        let token = self.credential.fetch_access_token(&self.http_client).await?;
        *cached = Some(token.clone());
        Ok(token)
    }
}

#[async_trait]
impl ReportsService for AnalyticsReportingClient {
    async fn batch_get(&self, request: &GetReportsRequest) -> ReportingResult<GetReportsResponse> {
        let token = self.valid_access_token().await?;

        tracing::info!(
            "Requesting {} report(s) from {}",
            request.report_requests.len(),
            self.batch_get_url
        );

        let response = self
            .http_client
            .post(&self.batch_get_url)
            .header(reqwest::header::AUTHORIZATION, token.authorization_header())
            .json(request)
            .send()
            .await
            .map_err(RemoteError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(RemoteError::Network)?;

        if !status.is_success() {
            tracing::warn!("Reporting API returned {}", status);
            return Err(api_error(status.as_u16(), &body).into());
        }

        let parsed: GetReportsResponse =
            serde_json::from_str(&body).map_err(RemoteError::InvalidResponse)?;

        tracing::debug!(
            "Received {} report(s), query cost {:?}",
            parsed.reports.len(),
            parsed.query_cost
        );
        Ok(parsed)
    }
}

fn api_error(status: u16, body: &str) -> RemoteError {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => RemoteError::Api {
            status,
            code: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => RemoteError::Api {
            status,
            code: None,
            message: if body.is_empty() {
                "Unknown error".to_string()
            } else {
                body.to_string()
            },
        },
    }
}
