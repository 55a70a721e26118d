use crate::reporting::model::{GetReportsResponse, Report, ReportRow};
use std::io::{self, Write};

/// Writes reports as `name: value` lines, one report after another
#[derive(Debug, Clone)]
pub struct ReportRenderer<'a> {
    view_id: &'a str,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(view_id: &'a str) -> Self {
        Self { view_id }
    }

    /// Render every report in response order.
    ///
    /// A report without a row list produces a single "No data found" line.
    /// Header names and row values are paired by position; when the lists
    /// differ in length the extra entries on the longer side are skipped.
    pub fn render<W: Write>(&self, response: &GetReportsResponse, out: &mut W) -> io::Result<()> {
        for report in &response.reports {
            self.render_report(report, out)?;
        }
        Ok(())
    }

    pub fn render_to_string(&self, response: &GetReportsResponse) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.render(response, &mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    fn render_report<W: Write>(&self, report: &Report, out: &mut W) -> io::Result<()> {
        let rows = match &report.data.rows {
            Some(rows) => rows,
            None => {
                tracing::debug!("Report for view {} has no rows", self.view_id);
                return writeln!(out, "No data found for {}", self.view_id);
            }
        };

        for row in rows {
            self.render_row(report, row, out)?;
        }
        Ok(())
    }

    fn render_row<W: Write>(&self, report: &Report, row: &ReportRow, out: &mut W) -> io::Result<()> {
        let dimension_headers = &report.column_header.dimensions;
        let metric_headers = &report.column_header.metric_header.metric_header_entries;

        if dimension_headers.len() != row.dimensions.len() {
            tracing::debug!(
                "Row has {} dimension value(s) for {} header(s)",
                row.dimensions.len(),
                dimension_headers.len()
            );
        }

        for (name, value) in dimension_headers.iter().zip(&row.dimensions) {
            writeln!(out, "{}: {}", name, value)?;
        }

        for (index, bundle) in row.metrics.iter().enumerate() {
            // The first metric continues the marker line.
            write!(out, "Date Range ({}): ", index)?;

            if bundle.values.len() != metric_headers.len() {
                tracing::debug!(
                    "Date range {} has {} value(s) for {} metric header(s)",
                    index,
                    bundle.values.len(),
                    metric_headers.len()
                );
            }

            let mut written = 0;
            for (header, value) in metric_headers.iter().zip(&bundle.values) {
                writeln!(out, "{}: {}", header.name, value)?;
                written += 1;
            }

            // Terminate a marker with no metric after it.
            if written == 0 {
                writeln!(out)?;
            }
        }
        Ok(())
    }
}
