//! Widget definitions and the payload shapes a chart renderer consumes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::RawValue;
use crate::schema::{Aggregation, ChartType};

/// Equality filters: column name to the value rows must hold.
pub type Filters = IndexMap<String, RawValue>;

/// One chart configured on a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Slot on the dashboard layout.
    #[serde(default)]
    pub position: u32,
    pub chart_type: ChartType,
    #[serde(default)]
    pub title: String,
    /// Selected columns (1-3).
    pub columns: Vec<String>,
    #[serde(default)]
    pub aggregation: Option<Aggregation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
}

impl Widget {
    /// Create a widget over the given columns.
    pub fn new<S: Into<String>>(
        chart_type: ChartType,
        title: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            position: 0,
            chart_type,
            title: title.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            aggregation: None,
            filters: None,
        }
    }

    /// Set the layout position.
    pub fn with_position(mut self, position: u32) -> Self {
        self.position = position;
        self
    }

    /// Set the aggregation.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Add an equality filter.
    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.filters
            .get_or_insert_with(Filters::new)
            .insert(column.into(), value.into());
        self
    }
}

/// Scalar KPI value; row counts stay integral on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Integer(i64),
    Float(f64),
}

impl ScalarValue {
    /// Numeric value.
    pub fn as_f64(&self) -> f64 {
        match self {
            ScalarValue::Integer(i) => *i as f64,
            ScalarValue::Float(f) => *f,
        }
    }
}

/// One series of a pivoted chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDataset {
    /// Group value this series belongs to.
    pub label: String,
    /// One reduced value per x label; absent cells are 0.
    pub data: Vec<RawValue>,
}

/// Result of aggregating a widget, shaped for the chart that draws it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetPayload {
    /// Row preview.
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<RawValue>>,
    },
    /// Single KPI value.
    Scalar { value: ScalarValue, label: String },
    /// Multi-series pivot.
    Pivot {
        labels: Vec<RawValue>,
        datasets: Vec<SeriesDataset>,
    },
    /// Labeled series (histograms, grouped reductions, raw pairs).
    Series {
        labels: Vec<RawValue>,
        data: Vec<RawValue>,
    },
}

impl WidgetPayload {
    /// The neutral `{labels: [], data: []}` payload.
    pub fn empty() -> Self {
        WidgetPayload::Series {
            labels: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Whether this payload carries no data points.
    pub fn is_empty(&self) -> bool {
        match self {
            WidgetPayload::Table { rows, .. } => rows.is_empty(),
            WidgetPayload::Scalar { .. } => false,
            WidgetPayload::Pivot { labels, .. } => labels.is_empty(),
            WidgetPayload::Series { labels, data } => labels.is_empty() && data.is_empty(),
        }
    }
}
