//! Dashboard rendering: one isolated aggregation per widget.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::Dashboard;
use crate::input::Dataset;
use crate::schema::ChartType;
use crate::widget::{Widget, WidgetAggregator, WidgetPayload};

/// Renderer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Aggregate widgets on the rayon thread pool.
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Rendered data for one widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetData {
    pub position: u32,
    pub chart_type: ChartType,
    pub title: String,
    pub data: WidgetPayload,
    /// Set when this widget failed; `data` is then the empty payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full render payload for a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub dashboard_id: String,
    pub name: String,
    pub layout_type: String,
    /// Widgets ordered by position.
    pub widgets: Vec<WidgetData>,
}

/// Runs the aggregator across every widget of a dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardRenderer {
    aggregator: WidgetAggregator,
    config: RenderConfig,
}

impl DashboardRenderer {
    /// Create a renderer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer from an aggregator and render settings.
    pub fn with_config(aggregator: WidgetAggregator, config: RenderConfig) -> Self {
        Self { aggregator, config }
    }

    /// Render every widget of `dashboard` against `dataset`.
    ///
    /// Widgets share nothing but the read-only dataset. A widget that fails
    /// gets the empty payload and an error message; the others are untouched.
    pub fn render(&self, dashboard: &Dashboard, dataset: &Dataset) -> DashboardData {
        debug!(
            dashboard = %dashboard.id,
            widgets = dashboard.widgets.len(),
            parallel = self.config.parallel,
            "rendering dashboard"
        );

        let mut widgets: Vec<WidgetData> = if self.config.parallel {
            dashboard
                .widgets
                .par_iter()
                .map(|w| self.render_widget(dataset, w))
                .collect()
        } else {
            dashboard
                .widgets
                .iter()
                .map(|w| self.render_widget(dataset, w))
                .collect()
        };

        widgets.sort_by_key(|w| w.position);

        DashboardData {
            dashboard_id: dashboard.id.clone(),
            name: dashboard.name.clone(),
            layout_type: dashboard.layout_type.clone(),
            widgets,
        }
    }

    fn render_widget(&self, dataset: &Dataset, widget: &Widget) -> WidgetData {
        let (data, error) = match self.aggregator.aggregate_widget(dataset, widget) {
            Ok(payload) => (payload, None),
            Err(e) => {
                warn!(position = widget.position, error = %e, "widget aggregation failed");
                (WidgetPayload::empty(), Some(e.to_string()))
            }
        };

        WidgetData {
            position: widget.position,
            chart_type: widget.chart_type,
            title: widget.title.clone(),
            data,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Aggregation;
    use crate::widget::AggregatorConfig;
    use serde_json::json;

    fn dataset() -> Dataset {
        Dataset::from_records(json!([
            {"city": "NY", "sales": 10},
            {"city": "LA", "sales": 5},
            {"city": "NY", "sales": 1},
        ]))
        .unwrap()
    }

    fn dashboard() -> Dashboard {
        Dashboard::new("Sales")
            .with_id("dash1")
            .with_widget(
                Widget::new(ChartType::Bar, "By city", ["city", "sales"])
                    .with_position(2)
                    .with_aggregation(Aggregation::Sum),
            )
            .with_widget(
                Widget::new(ChartType::Kpi, "Total", ["sales"])
                    .with_position(0)
                    .with_aggregation(Aggregation::Sum),
            )
            .with_widget(
                Widget::new(ChartType::Kpi, "Broken", ["nope", "sales"])
                    .with_position(1)
                    .with_aggregation(Aggregation::Sum),
            )
    }

    #[test]
    fn test_render_orders_by_position() {
        let data = DashboardRenderer::new().render(&dashboard(), &dataset());

        let positions: Vec<u32> = data.widgets.iter().map(|w| w.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(data.dashboard_id, "dash1");
        assert_eq!(data.layout_type, "default_6");

        let json = serde_json::to_value(&data.widgets[0]).unwrap();
        assert_eq!(
            json,
            json!({"position": 0, "chart_type": "kpi", "title": "Total", "data": {"value": 16.0, "label": "sales"}})
        );
        assert!(data.widgets[1].data.is_empty());
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let sequential = DashboardRenderer::with_config(
            WidgetAggregator::new(),
            RenderConfig { parallel: false },
        );
        assert_eq!(
            sequential.render(&dashboard(), &dataset()),
            DashboardRenderer::new().render(&dashboard(), &dataset())
        );
    }

    #[test]
    fn test_failing_widget_leaves_siblings_intact() {
        let dataset = Dataset::from_records(json!([
            {"city": "NY", "store": "a", "sales": 10},
            {"city": "LA", "store": "b", "sales": 5},
            {"city": "NY", "store": "c", "sales": 1},
        ]))
        .unwrap();
        let dashboard = dashboard().with_widget(
            Widget::new(ChartType::Line, "Stores by city", ["city", "store", "sales"])
                .with_position(3)
                .with_aggregation(Aggregation::Sum),
        );

        let tight = DashboardRenderer::with_config(
            WidgetAggregator::with_config(AggregatorConfig {
                max_pivot_cells: Some(4),
                ..AggregatorConfig::default()
            }),
            RenderConfig::default(),
        );
        let data = tight.render(&dashboard, &dataset);
        let baseline = DashboardRenderer::new().render(&dashboard, &dataset);

        let failed = &data.widgets[3];
        assert_eq!(failed.data, WidgetPayload::empty());
        assert!(failed.error.as_deref().unwrap().contains("Pivot too large"));
        assert!(baseline.widgets[3].error.is_none());

        assert_eq!(&data.widgets[..3], &baseline.widgets[..3]);
        assert!(data.widgets[..3].iter().all(|w| w.error.is_none()));
        assert_eq!(
            serde_json::to_value(&data.widgets[2].data).unwrap(),
            json!({"labels": ["NY", "LA"], "data": [11, 5]})
        );
    }

    #[test]
    fn test_failing_widget_is_isolated() {
        let renderer = DashboardRenderer::with_config(
            WidgetAggregator::with_config(AggregatorConfig {
                max_rows: Some(2),
                ..AggregatorConfig::default()
            }),
            RenderConfig::default(),
        );
        let data = renderer.render(&dashboard(), &dataset());

        assert_eq!(data.widgets.len(), 3);
        for widget in &data.widgets {
            assert_eq!(widget.data, WidgetPayload::empty());
            assert!(widget.error.as_deref().unwrap().contains("Row limit exceeded"));
        }
    }
}
