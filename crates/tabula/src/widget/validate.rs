//! Pre-save checks that a widget's columns and aggregation suit its chart.
//!
//! Aggregation itself never fails on a badly configured widget; these
//! checks let a caller reject the configuration before it is persisted.

use serde::{Deserialize, Serialize};

use super::types::Widget;
use crate::profile::ColumnProfile;
use crate::schema::{Aggregation, ChartType, ColumnType};

/// Pie charts get hard to read past this many slices.
const PIE_MAX_SLICES: usize = 10;

/// Severity of a widget issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// The widget renders, but probably not usefully.
    Warning,
    /// The widget configuration is invalid.
    Error,
}

impl IssueSeverity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            IssueSeverity::Warning => "Warning",
            IssueSeverity::Error => "Error",
        }
    }
}

/// A problem found in a widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetIssue {
    /// Position of the offending widget.
    pub position: u32,
    pub severity: IssueSeverity,
    pub message: String,
}

/// Whether any issue is an error.
pub fn has_errors(issues: &[WidgetIssue]) -> bool {
    issues.iter().any(|i| i.severity == IssueSeverity::Error)
}

struct Checker<'a> {
    widget: &'a Widget,
    issues: Vec<WidgetIssue>,
}

impl Checker<'_> {
    fn push(&mut self, severity: IssueSeverity, message: impl Into<String>) {
        self.issues.push(WidgetIssue {
            position: self.widget.position,
            severity,
            message: message.into(),
        });
    }

    fn error(&mut self, message: impl Into<String>) {
        self.push(IssueSeverity::Error, message);
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.push(IssueSeverity::Warning, message);
    }
}

/// Check one widget against the profiles of the dataset it will read.
pub fn validate_widget(widget: &Widget, profiles: &[ColumnProfile]) -> Vec<WidgetIssue> {
    let mut check = Checker {
        widget,
        issues: Vec::new(),
    };

    if widget.title.trim().is_empty() {
        check.error("Title is required");
    }

    if widget.columns.is_empty() {
        check.error("Select at least one column");
        return check.issues;
    }

    let columns: Vec<Option<&ColumnProfile>> = widget
        .columns
        .iter()
        .map(|name| profiles.iter().find(|p| &p.column_name == name))
        .collect();

    for (name, profile) in widget.columns.iter().zip(&columns) {
        if profile.is_none() {
            check.error(format!("Unknown column '{}'", name));
        }
    }

    let type_at = |idx: usize| columns.get(idx).copied().flatten().map(|p| p.column_type);
    let is_axis = |t: Option<ColumnType>| matches!(t, Some(ColumnType::Text | ColumnType::Date));

    match widget.chart_type {
        ChartType::Kpi => {
            if widget.columns.len() != 1 {
                check.error("KPI requires exactly 1 column");
            }
            if type_at(0) != Some(ColumnType::Number) {
                check.error("KPI requires a numeric column");
            }
            if widget.aggregation.is_none() {
                check.error("KPI requires an aggregation");
            }
        }
        ChartType::Bar | ChartType::Line | ChartType::Area => {
            let label = widget.chart_type.as_str().to_uppercase();
            let multi_series = widget.columns.len() == 3 && widget.chart_type != ChartType::Area;

            if multi_series {
                if !is_axis(type_at(0)) {
                    check.error("First column must be text or date");
                }
                if type_at(1) != Some(ColumnType::Text) {
                    check.error("Second column must be text");
                }
                if type_at(2) != Some(ColumnType::Number) {
                    check.error("Third column must be numeric");
                }
            } else {
                if widget.columns.len() != 2 {
                    check.error(format!("{} requires exactly 2 columns", label));
                }
                if !is_axis(type_at(0)) {
                    check.error("First column must be text or date");
                }
                if type_at(1) != Some(ColumnType::Number) {
                    check.error("Second column must be numeric");
                }
            }
            if widget.aggregation.is_none() {
                check.error(format!("{} requires an aggregation", label));
            }
        }
        ChartType::Pie => {
            if widget.columns.len() != 1 {
                check.error("PIE requires exactly 1 column");
            }
            if type_at(0) != Some(ColumnType::Text) {
                check.error("PIE requires a text column");
            }
            let slices = columns
                .first()
                .copied()
                .flatten()
                .and_then(|p| p.text())
                .map(|t| t.unique_count)
                .unwrap_or(0);
            if slices > PIE_MAX_SLICES {
                check.warn(format!(
                    "PIE works best with at most {} distinct values (found {})",
                    PIE_MAX_SLICES, slices
                ));
            }
            if widget.aggregation != Some(Aggregation::Count) {
                check.error("PIE requires the 'count' aggregation");
            }
        }
        ChartType::Table => {
            if widget.aggregation.is_some() {
                check.error("TABLE must not have an aggregation");
            }
        }
    }

    check.issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawValue;
    use crate::profile::ColumnClassifier;

    fn text(values: &[&str]) -> Vec<RawValue> {
        values.iter().map(|v| RawValue::from(*v)).collect()
    }

    fn profiles() -> Vec<ColumnProfile> {
        let classifier = ColumnClassifier::new();
        let many: Vec<String> = (0..12).map(|i| format!("c{}", i)).collect();
        let many: Vec<&str> = many.iter().map(String::as_str).collect();

        vec![
            classifier.analyze_column("region", ColumnType::Text, &text(&["East", "West"])),
            classifier.analyze_column("sales", ColumnType::Number, &text(&["1", "2"])),
            classifier.analyze_column("month", ColumnType::Date, &text(&["2024-01", "2024-02"])),
            classifier.analyze_column("customer", ColumnType::Text, &text(&many)),
        ]
    }

    #[test]
    fn test_valid_widgets() {
        let profiles = profiles();
        let widgets = [
            Widget::new(ChartType::Kpi, "Total", ["sales"]).with_aggregation(Aggregation::Sum),
            Widget::new(ChartType::Bar, "By region", ["region", "sales"]).with_aggregation(Aggregation::Sum),
            Widget::new(ChartType::Line, "Trend", ["month", "region", "sales"])
                .with_aggregation(Aggregation::Sum),
            Widget::new(ChartType::Pie, "Share", ["region"]).with_aggregation(Aggregation::Count),
            Widget::new(ChartType::Table, "Rows", ["region", "sales", "month"]),
        ];

        for widget in &widgets {
            assert!(validate_widget(widget, &profiles).is_empty(), "{:?}", widget);
        }
    }

    #[test]
    fn test_kpi_rules() {
        let widget = Widget::new(ChartType::Kpi, "", ["region"]);
        let issues = validate_widget(&widget, &profiles());
        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();

        assert_eq!(
            messages,
            vec!["Title is required", "KPI requires a numeric column", "KPI requires an aggregation"]
        );
        assert!(has_errors(&issues));
    }

    #[test]
    fn test_area_needs_two_columns() {
        let widget = Widget::new(ChartType::Area, "x", ["month", "region", "sales"])
            .with_aggregation(Aggregation::Sum);
        let issues = validate_widget(&widget, &profiles());
        assert!(issues.iter().any(|i| i.message == "AREA requires exactly 2 columns"));
    }

    #[test]
    fn test_unknown_column() {
        let widget = Widget::new(ChartType::Table, "x", ["nope"]).with_position(4);
        let issues = validate_widget(&widget, &profiles());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].position, 4);
        assert!(issues[0].message.contains("nope"));
    }

    #[test]
    fn test_pie_many_values_is_warning() {
        let widget = Widget::new(ChartType::Pie, "Customers", ["customer"]).with_aggregation(Aggregation::Count);
        let issues = validate_widget(&widget, &profiles());

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, IssueSeverity::Warning);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn test_table_rejects_aggregation() {
        let widget = Widget::new(ChartType::Table, "x", ["region"]).with_aggregation(Aggregation::Count);
        let issues = validate_widget(&widget, &profiles());
        assert_eq!(issues[0].message, "TABLE must not have an aggregation");
    }

    #[test]
    fn test_no_columns() {
        let widget = Widget::new(ChartType::Bar, "x", Vec::<String>::new());
        let issues = validate_widget(&widget, &profiles());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Select at least one column");
    }
}
