use crate::auth::{ReportingScope, ServiceAccountCredential};
use crate::config::ReportingConfig;
use crate::error::{ReportingError, ReportingResult};
use crate::render::ReportRenderer;
use crate::reporting::{
    event_label_report, AnalyticsReportingClient, GetReportsRequest, GetReportsResponse,
    ReportsService,
};
use std::io::Write;

/// Load the credential, query the API once and render the result.
///
/// Setup failures return before any network traffic.
pub async fn run<W: Write>(config: &ReportingConfig, out: &mut W) -> ReportingResult<()> {
    config.validate()?;

    let credential = ServiceAccountCredential::from_file(&config.key_file_path, ReportingScope::all())?;
    let client = AnalyticsReportingClient::new(config, credential)?;
    tracing::debug!("Initialized client for {}", client.application_name());

    fetch_and_render(&client, config, out).await?;
    Ok(())
}

/// Build the event label query, send it and render the response
pub async fn fetch_and_render<S, W>(
    service: &S,
    config: &ReportingConfig,
    out: &mut W,
) -> ReportingResult<GetReportsResponse>
where
    S: ReportsService + ?Sized,
    W: Write,
{
    let request = GetReportsRequest::single(event_label_report(
        &config.view_id,
        config.store_id.as_deref(),
    ));

    let response = service.batch_get(&request).await?;

    ReportRenderer::new(&config.view_id).render(&response, out)?;
    out.flush()?;

    Ok(response)
}

/// Single log line for a failed run. The message already carries the nested causes.
pub fn failure_message(err: &ReportingError) -> String {
    if err.is_setup() {
        format!("{} (no request was sent)", err)
    } else {
        err.to_string()
    }
}
