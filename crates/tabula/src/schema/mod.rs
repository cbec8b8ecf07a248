//! Schema types: column vocabulary and templates.

mod template;
mod types;

pub use template::Template;
pub use types::{Aggregation, ChartType, ColumnType};
