pub mod client;
pub mod model;
pub mod query;

pub use client::AnalyticsReportingClient;
pub use model::{GetReportsRequest, GetReportsResponse, ReportRequest};
pub use query::{event_label_report, ReportRequestBuilder};

use crate::error::ReportingResult;
use async_trait::async_trait;

/// The `reports` collection of the Reporting API
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Run every request in the batch and return one report per request
    async fn batch_get(&self, request: &GetReportsRequest) -> ReportingResult<GetReportsResponse>;
}
