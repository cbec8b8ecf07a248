//! Dashboard definitions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabulaError};
use crate::profile::ColumnProfile;
use crate::widget::{validate_widget, IssueSeverity, Widget, WidgetIssue};

/// Layout used when a dashboard does not name one.
pub const DEFAULT_LAYOUT: &str = "default_6";

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

/// An ordered set of widgets over one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub id: String,
    /// Owning user.
    #[serde(default)]
    pub owner: String,
    /// Template the dataset was uploaded against.
    #[serde(default)]
    pub template_id: String,
    /// Dataset every widget reads.
    #[serde(default)]
    pub data_id: String,
    #[serde(default)]
    pub name: String,
    /// Layout identifier understood by the front end.
    #[serde(default = "default_layout")]
    pub layout_type: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl Dashboard {
    /// Create an empty dashboard with the default layout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            owner: String::new(),
            template_id: String::new(),
            data_id: String::new(),
            name: name.into(),
            layout_type: default_layout(),
            widgets: Vec::new(),
        }
    }

    /// Load a dashboard definition from a JSON file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TabulaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = template_id.into();
        self
    }

    pub fn with_data(mut self, data_id: impl Into<String>) -> Self {
        self.data_id = data_id.into();
        self
    }

    pub fn with_layout(mut self, layout_type: impl Into<String>) -> Self {
        self.layout_type = layout_type.into();
        self
    }

    /// Append a widget.
    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }
}

/// Check every widget of a dashboard, plus position uniqueness.
pub fn validate_dashboard(dashboard: &Dashboard, profiles: &[ColumnProfile]) -> Vec<WidgetIssue> {
    let mut issues = Vec::new();
    let mut positions = HashSet::new();

    for widget in &dashboard.widgets {
        if !positions.insert(widget.position) {
            issues.push(WidgetIssue {
                position: widget.position,
                severity: IssueSeverity::Error,
                message: format!("Duplicate widget position {}", widget.position),
            });
        }
        issues.extend(validate_widget(widget, profiles));
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ChartType;
    use serde_json::json;

    #[test]
    fn test_default_layout() {
        let dashboard: Dashboard = serde_json::from_value(json!({
            "name": "Sales",
            "data_id": "d1",
            "widgets": [{"position": 0, "chart_type": "table", "title": "Rows", "columns": ["a"]}]
        }))
        .unwrap();

        assert_eq!(dashboard.layout_type, "default_6");
        assert_eq!(dashboard.widgets.len(), 1);
        assert_eq!(Dashboard::new("x").layout_type, DEFAULT_LAYOUT);
    }

    #[test]
    fn test_duplicate_positions() {
        let dashboard = Dashboard::new("d")
            .with_widget(Widget::new(ChartType::Table, "a", ["a"]).with_position(1))
            .with_widget(Widget::new(ChartType::Table, "b", ["a"]).with_position(1));

        let issues = validate_dashboard(&dashboard, &[]);
        assert!(issues.iter().any(|i| i.message == "Duplicate widget position 1"));
    }
}
