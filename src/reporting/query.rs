use crate::reporting::model::{
    DateRange, Dimension, DimensionFilter, DimensionFilterClause, Metric, ReportRequest,
};

pub const LAST_WEEK_START: &str = "7DaysAgo";
pub const TODAY: &str = "today";
pub const TOTAL_EVENTS: &str = "ga:totalEvents";
pub const EVENT_LABEL: &str = "ga:eventLabel";
pub const EVENT_CATEGORY: &str = "ga:eventCategory";
pub const EVENT_ACTION: &str = "ga:eventAction";
pub const STORE_DIMENSION: &str = "ga:dimension1";
pub const ITEM_CATEGORY: &str = "Item";
pub const ADD_TO_ORDER_ACTION: &str = "Add to Order";

/// Fluent construction of a [`ReportRequest`]
#[derive(Debug, Clone)]
pub struct ReportRequestBuilder {
    request: ReportRequest,
}

impl ReportRequest {
    pub fn builder(view_id: impl Into<String>) -> ReportRequestBuilder {
        ReportRequestBuilder {
            request: ReportRequest {
                view_id: view_id.into(),
                ..Default::default()
            },
        }
    }
}

impl ReportRequestBuilder {
    pub fn date_range(mut self, start_date: &str, end_date: &str) -> Self {
        self.request.date_ranges.push(DateRange::new(start_date, end_date));
        self
    }

    pub fn metric(mut self, expression: &str) -> Self {
        self.request.metrics.push(Metric::new(expression));
        self
    }

    pub fn dimension(mut self, name: &str) -> Self {
        self.request.dimensions.push(Dimension::new(name));
        self
    }

    pub fn filter_clause(mut self, clause: DimensionFilterClause) -> Self {
        self.request.dimension_filter_clauses.push(clause);
        self
    }

    pub fn page_size(mut self, page_size: i32) -> Self {
        self.request.page_size = Some(page_size);
        self
    }

    pub fn build(self) -> ReportRequest {
        self.request
    }
}

/// Labels of "Item" events logged with action "Add to Order" over the last
/// seven days, counted by `ga:totalEvents`.
///
/// The category and action filters are ANDed and evaluated server side. When
/// `store_id` is set, a `ga:dimension1` match is added to the same clause.
pub fn event_label_report(view_id: &str, store_id: Option<&str>) -> ReportRequest {
    let mut filters = vec![
        DimensionFilter::exact(EVENT_CATEGORY, ITEM_CATEGORY),
        DimensionFilter::exact(EVENT_ACTION, ADD_TO_ORDER_ACTION),
    ];

    if let Some(store_id) = store_id {
        filters.push(DimensionFilter::exact(STORE_DIMENSION, store_id));
    }

    ReportRequest::builder(view_id)
        .date_range(LAST_WEEK_START, TODAY)
        .metric(TOTAL_EVENTS)
        .dimension(EVENT_LABEL)
        .filter_clause(DimensionFilterClause::all_of(filters))
        .build()
}
