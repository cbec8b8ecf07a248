//! Tabula: tabular analysis and widget aggregation engine.
//!
//! Tabula profiles the columns of an uploaded dataset against its template,
//! proposes charts from those profiles, and computes the series each
//! dashboard widget needs (grouping, pivoting, filtering) on demand.
//!
//! # Core Principles
//!
//! - **Stateless**: every call is a pure function of its inputs
//! - **Degrade, don't fail**: malformed values and missing columns yield
//!   empty or zero results, never errors
//! - **Explicit coercion**: cell values are a tagged variant with explicit
//!   conversions
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tabula::{Aggregation, ChartType, ColumnType, Dataset, Engine, Template, Widget};
//!
//! let template = Template::new("People")
//!     .with_column("age", ColumnType::Number)
//!     .with_column("city", ColumnType::Text);
//! let dataset = Dataset::from_records(json!([
//!     {"age": 25, "city": "NY"},
//!     {"age": 35, "city": "NY"},
//!     {"age": 45, "city": "LA"},
//! ]))
//! .unwrap();
//!
//! let engine = Engine::new();
//! let profile = engine.analyze(&dataset, &template).unwrap();
//! println!("Suggestions: {}", profile.visualization_suggestions.len());
//!
//! let widget = Widget::new(ChartType::Bar, "Age by city", ["city", "age"])
//!     .with_aggregation(Aggregation::Sum);
//! let payload = engine.aggregate(&dataset, &widget).unwrap();
//! println!("{}", serde_json::to_string(&payload).unwrap());
//! ```

pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod input;
pub mod profile;
pub mod schema;
pub mod suggestion;
pub mod widget;

mod engine;

pub use crate::engine::{DataProfile, Engine, EngineConfig};
pub use catalog::{Catalog, MemoryCatalog};
pub use dashboard::{Dashboard, DashboardData, DashboardRenderer, RenderConfig, WidgetData};
pub use error::{Result, TabulaError};
pub use input::{Dataset, Parser, RawValue, SourceFormat, SourceMetadata};
pub use profile::{ColumnClassifier, ColumnProfile};
pub use schema::{Aggregation, ChartType, ColumnType, Template};
pub use suggestion::{SuggestionEngine, VisualizationSuggestion};
pub use widget::{Widget, WidgetAggregator, WidgetIssue, WidgetPayload};
