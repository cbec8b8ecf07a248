//! Visualization suggestion type.

use serde::{Deserialize, Serialize};

use crate::schema::{Aggregation, ChartType};

/// A proposed chart widget for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationSuggestion {
    /// Kind of chart.
    pub chart_type: ChartType,

    /// Display title, naming the involved columns.
    pub title: String,

    /// Columns the chart reads, in widget order.
    pub columns: Vec<String>,

    /// Aggregation to apply, if any.
    pub aggregation: Option<Aggregation>,

    /// Priority (1 = highest, larger = lower priority).
    pub priority: u8,

    /// Human-readable explanation.
    pub description: String,
}

impl VisualizationSuggestion {
    /// Create a new suggestion.
    pub fn new(chart_type: ChartType, title: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            chart_type,
            title: title.into(),
            columns,
            aggregation: None,
            priority: 5,
            description: String::new(),
        }
    }

    /// Set the aggregation.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
