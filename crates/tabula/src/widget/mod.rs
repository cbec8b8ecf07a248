//! Widgets: configuration, aggregation into chart payloads, and validation.

mod aggregator;
mod reduce;
mod types;
mod validate;

pub use aggregator::{AggregatorConfig, WidgetAggregator};
pub use types::{Filters, ScalarValue, SeriesDataset, Widget, WidgetPayload};
pub use validate::{has_errors, validate_widget, IssueSeverity, WidgetIssue};
