//! Wire types for the `reports:batchGet` method of the Analytics Reporting API v4.
//!
//! Field names follow the REST resources (camelCase on the wire). List fields the
//! service omits when empty default to an empty `Vec`; `ReportData::rows` is kept
//! as an `Option` because an absent row list means "no data for this view".

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetReportsRequest {
    pub report_requests: Vec<ReportRequest>,
}

impl GetReportsRequest {
    /// Batch holding exactly one report request
    pub fn single(request: ReportRequest) -> Self {
        Self {
            report_requests: vec![request],
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub view_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_ranges: Vec<DateRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimension_filter_clauses: Vec<DimensionFilterClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_empty_rows: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_totals: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_value_ranges: Option<bool>,
}

/// Start and end dates, either `YYYY-MM-DD` or relative (`today`, `yesterday`, `NdaysAgo`)
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

impl DateRange {
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatting_type: Option<MetricType>,
}

impl Metric {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub name: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterLogicalOperator {
    #[default]
    Or,
    And,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilterClause {
    pub operator: FilterLogicalOperator,
    pub filters: Vec<DimensionFilter>,
}

impl DimensionFilterClause {
    /// Clause that matches only when every filter matches
    pub fn all_of(filters: Vec<DimensionFilter>) -> Self {
        Self {
            operator: FilterLogicalOperator::And,
            filters,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DimensionFilterOperator {
    #[default]
    Regexp,
    BeginsWith,
    EndsWith,
    Partial,
    Exact,
    NumericEqual,
    NumericGreaterThan,
    NumericLessThan,
    InList,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilter {
    pub dimension_name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not: bool,
    pub operator: DimensionFilterOperator,
    pub expressions: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub case_sensitive: bool,
}

impl DimensionFilter {
    /// Exact match of `dimension_name` against a single literal
    pub fn exact(dimension_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            dimension_name: dimension_name.into(),
            operator: DimensionFilterOperator::Exact,
            expressions: vec![value.into()],
            ..Default::default()
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetReportsResponse {
    #[serde(default)]
    pub reports: Vec<Report>,
    pub query_cost: Option<i64>,
    pub resource_quotas_remaining: Option<ResourceQuotasRemaining>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQuotasRemaining {
    pub daily_quota_tokens_remaining: Option<i64>,
    pub hourly_quota_tokens_remaining: Option<i64>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(default)]
    pub column_header: ColumnHeader,
    #[serde(default)]
    pub data: ReportData,
    pub next_page_token: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeader {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metric_header: MetricHeader,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricHeader {
    #[serde(default)]
    pub metric_header_entries: Vec<MetricHeaderEntry>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct MetricHeaderEntry {
    pub name: String,
    #[serde(rename = "type", default)]
    pub metric_type: MetricType,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    #[default]
    MetricTypeUnspecified,
    Integer,
    Float,
    Currency,
    Percent,
    Time,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub rows: Option<Vec<ReportRow>>,
    #[serde(default)]
    pub totals: Vec<DateRangeValues>,
    pub row_count: Option<i64>,
    #[serde(default)]
    pub minimums: Vec<DateRangeValues>,
    #[serde(default)]
    pub maximums: Vec<DateRangeValues>,
    pub is_data_golden: Option<bool>,
    pub data_last_refreshed: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<DateRangeValues>,
}

/// Metric values for one requested date range, in metric header order
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeValues {
    #[serde(default)]
    pub values: Vec<String>,
}
