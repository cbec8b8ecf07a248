//! Dashboards and their render orchestration.

mod model;
mod render;

pub use model::{validate_dashboard, Dashboard, DEFAULT_LAYOUT};
pub use render::{DashboardData, DashboardRenderer, RenderConfig, WidgetData};
