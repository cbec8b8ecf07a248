//! Rule-based visualization suggestions from column profiles.
//!
//! Profiles are partitioned by declared type, then a fixed sequence of rules
//! appends suggestions. The result is stable-sorted by priority, so
//! suggestions from one rule keep their generation order.

use crate::profile::ColumnProfile;
use crate::schema::{Aggregation, ChartType, ColumnType};

use super::VisualizationSuggestion;

/// Number columns that get a KPI.
const MAX_KPIS: usize = 3;
/// Number columns paired with the first date or category column.
const MAX_SERIES: usize = 2;
/// Columns shown in the table preview.
const MAX_TABLE_COLUMNS: usize = 5;

/// Generates chart suggestions using rule-based logic.
pub struct SuggestionEngine;

impl SuggestionEngine {
    /// Suggest visualizations for a profiled dataset.
    pub fn suggest(profiles: &[ColumnProfile]) -> Vec<VisualizationSuggestion> {
        let date_cols = Self::names(profiles, |p| p.column_type == ColumnType::Date);
        let number_cols = Self::names(profiles, |p| p.column_type == ColumnType::Number);
        let text_cols = Self::names(profiles, |p| {
            p.column_type == ColumnType::Text && p.is_categorical()
        });

        let mut suggestions = Vec::new();

        for &number in number_cols.iter().take(MAX_KPIS) {
            suggestions.push(Self::suggest_kpi(number));
        }

        if let Some(&date) = date_cols.first() {
            for &number in number_cols.iter().take(MAX_SERIES) {
                suggestions.push(Self::suggest_trend(date, number));
            }
        }

        if let Some(&category) = text_cols.first() {
            for &number in number_cols.iter().take(MAX_SERIES) {
                suggestions.push(Self::suggest_breakdown(category, number));
            }
        }

        if let (Some(&date), Some(&category), Some(&number)) =
            (date_cols.first(), text_cols.first(), number_cols.first())
        {
            suggestions.push(Self::suggest_multi_series(date, category, number));
        }

        if profiles.len() >= 2 {
            suggestions.push(Self::suggest_table(profiles));
        }

        // Sort by priority (lower = higher priority)
        suggestions.sort_by_key(|s| s.priority);

        suggestions
    }

    fn names(profiles: &[ColumnProfile], keep: impl Fn(&ColumnProfile) -> bool) -> Vec<&str> {
        profiles
            .iter()
            .filter(|p| keep(*p))
            .map(|p| p.column_name.as_str())
            .collect()
    }

    fn suggest_kpi(number: &str) -> VisualizationSuggestion {
        VisualizationSuggestion::new(ChartType::Kpi, format!("Total {}", number), vec![number.to_string()])
            .with_aggregation(Aggregation::Sum)
            .with_priority(1)
            .with_description(format!("Sum of all values in '{}'.", number))
    }

    fn suggest_trend(date: &str, number: &str) -> VisualizationSuggestion {
        VisualizationSuggestion::new(
            ChartType::Line,
            format!("{} over {}", number, date),
            vec![date.to_string(), number.to_string()],
        )
        .with_aggregation(Aggregation::Sum)
        .with_priority(2)
        .with_description(format!("Trend of '{}' summed per '{}'.", number, date))
    }

    fn suggest_breakdown(category: &str, number: &str) -> VisualizationSuggestion {
        VisualizationSuggestion::new(
            ChartType::Bar,
            format!("{} by {}", number, category),
            vec![category.to_string(), number.to_string()],
        )
        .with_aggregation(Aggregation::Sum)
        .with_priority(3)
        .with_description(format!("Compare '{}' across each '{}' value.", number, category))
    }

    fn suggest_multi_series(date: &str, category: &str, number: &str) -> VisualizationSuggestion {
        VisualizationSuggestion::new(
            ChartType::Line,
            format!("{} over {} by {}", number, date, category),
            vec![date.to_string(), category.to_string(), number.to_string()],
        )
        .with_aggregation(Aggregation::Sum)
        .with_priority(4)
        .with_description(format!(
            "One '{}' series per '{}' value, plotted over '{}'.",
            number, category, date
        ))
    }

    fn suggest_table(profiles: &[ColumnProfile]) -> VisualizationSuggestion {
        let columns: Vec<String> = profiles
            .iter()
            .take(MAX_TABLE_COLUMNS)
            .map(|p| p.column_name.clone())
            .collect();
        let description = format!("Raw rows for {}.", columns.join(", "));

        VisualizationSuggestion::new(ChartType::Table, "Data preview", columns)
            .with_priority(5)
            .with_description(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawValue;
    use crate::profile::ColumnClassifier;

    fn profile(name: &str, column_type: ColumnType, values: &[&str]) -> ColumnProfile {
        let values: Vec<RawValue> = values.iter().map(|v| RawValue::from(*v)).collect();
        ColumnClassifier::new().analyze_column(name, column_type, &values)
    }

    #[test]
    fn test_number_and_date() {
        let profiles = vec![
            profile("sales", ColumnType::Number, &["1", "2"]),
            profile("day", ColumnType::Date, &["2024-01-01", "2024-01-02"]),
        ];

        let suggestions = SuggestionEngine::suggest(&profiles);
        let kinds: Vec<(ChartType, u8)> =
            suggestions.iter().map(|s| (s.chart_type, s.priority)).collect();

        assert_eq!(
            kinds,
            vec![(ChartType::Kpi, 1), (ChartType::Line, 2), (ChartType::Table, 5)]
        );
        assert_eq!(suggestions[1].columns, vec!["day", "sales"]);
        assert!(suggestions[0].title.contains("sales"));
    }

    #[test]
    fn test_kpis_capped_at_three() {
        let profiles: Vec<ColumnProfile> = ["a", "b", "c", "d"]
            .iter()
            .map(|n| profile(n, ColumnType::Number, &["1"]))
            .collect();

        let suggestions = SuggestionEngine::suggest(&profiles);
        let kpis: Vec<&str> = suggestions
            .iter()
            .filter(|s| s.chart_type == ChartType::Kpi)
            .map(|s| s.columns[0].as_str())
            .collect();

        assert_eq!(kpis, vec!["a", "b", "c"]);
        assert_eq!(suggestions.last().unwrap().columns, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_full_rule_set_is_sorted() {
        let profiles = vec![
            profile("region", ColumnType::Text, &["East", "West"]),
            profile("sales", ColumnType::Number, &["1", "2"]),
            profile("units", ColumnType::Number, &["3", "4"]),
            profile("month", ColumnType::Date, &["2024-01", "2024-02"]),
        ];

        let suggestions = SuggestionEngine::suggest(&profiles);
        let priorities: Vec<u8> = suggestions.iter().map(|s| s.priority).collect();
        assert_eq!(priorities, vec![1, 1, 2, 2, 3, 3, 4, 5]);

        let multi = &suggestions[6];
        assert_eq!(multi.chart_type, ChartType::Line);
        assert_eq!(multi.columns, vec!["month", "region", "sales"]);
    }

    #[test]
    fn test_non_categorical_text_ignored() {
        let many: Vec<String> = (0..30).map(|i| format!("id{}", i)).collect();
        let many: Vec<&str> = many.iter().map(String::as_str).collect();
        let profiles = vec![
            profile("id", ColumnType::Text, &many),
            profile("sales", ColumnType::Number, &["1"]),
        ];

        let suggestions = SuggestionEngine::suggest(&profiles);
        assert!(suggestions.iter().all(|s| s.chart_type != ChartType::Bar));
    }

    #[test]
    fn test_single_column_has_no_table() {
        let profiles = vec![profile("region", ColumnType::Text, &["East"])];
        assert!(SuggestionEngine::suggest(&profiles).is_empty());
    }
}
