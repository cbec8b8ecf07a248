//! Column statistics classifier.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::column::{
    BooleanStatistics, ColumnProfile, ColumnStatistics, DateStatistics, NumericStatistics,
    TextStatistics,
};
use crate::input::RawValue;
use crate::schema::ColumnType;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Lowercase spellings that read as true in a boolean column.
const TRUTHY: &[&str] = &["true", "1", "yes", "si"];

/// Output format for date statistics.
const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Year-month values such as "2024-03" have no day for chrono to parse.
static YEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").unwrap());

/// Round to 2 decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Maximum distinct values for a text column to count as categorical.
    pub categorical_threshold: usize,
    /// Number of distinct sample values kept for text columns.
    pub sample_size: usize,
    /// chrono formats tried in order when parsing date cells.
    pub date_formats: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            categorical_threshold: 20,
            sample_size: 5,
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%m/%d/%Y".to_string(),
                "%d/%m/%Y".to_string(),
                "%Y/%m/%d".to_string(),
                "%Y%m%d".to_string(),
            ],
        }
    }
}

// =============================================================================
// CLASSIFIER
// =============================================================================

/// Computes descriptive statistics for a column according to its declared type.
///
/// Malformed cells never raise: blank cells count as null, and non-blank
/// cells that fail coercion count as non-null but are left out of the
/// type-specific statistics.
#[derive(Debug, Clone, Default)]
pub struct ColumnClassifier {
    config: ClassifierConfig,
}

impl ColumnClassifier {
    /// Create a classifier with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom configuration.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Profile one column.
    pub fn analyze_column<'a>(
        &self,
        name: &str,
        column_type: ColumnType,
        values: impl IntoIterator<Item = &'a RawValue>,
    ) -> ColumnProfile {
        let mut total_count = 0;
        let mut present: Vec<&RawValue> = Vec::new();
        for value in values {
            total_count += 1;
            if !value.is_missing() {
                present.push(value);
            }
        }

        let non_null_count = present.len();
        let null_count = total_count - non_null_count;
        let null_percentage = if total_count == 0 {
            0.0
        } else {
            round2(null_count as f64 / total_count as f64 * 100.0)
        };

        let statistics = if present.is_empty() {
            None
        } else {
            match column_type {
                ColumnType::Number => numeric_statistics(&present).map(ColumnStatistics::Numeric),
                ColumnType::Text => Some(ColumnStatistics::Text(self.text_statistics(&present))),
                ColumnType::Date => Some(ColumnStatistics::Date(self.date_statistics(&present))),
                ColumnType::Boolean => {
                    Some(ColumnStatistics::Boolean(boolean_statistics(&present)))
                }
            }
        };

        ColumnProfile {
            column_name: name.to_string(),
            column_type,
            total_count,
            non_null_count,
            null_count,
            null_percentage,
            statistics,
        }
    }

    fn text_statistics(&self, values: &[&RawValue]) -> TextStatistics {
        let distinct: IndexSet<String> = values.iter().map(|v| v.to_text()).collect();
        let unique_count = distinct.len();

        TextStatistics {
            unique_count,
            sample_values: distinct.into_iter().take(self.config.sample_size).collect(),
            is_categorical: unique_count <= self.config.categorical_threshold,
        }
    }

    fn date_statistics(&self, values: &[&RawValue]) -> DateStatistics {
        let parsed: Vec<NaiveDateTime> = values
            .iter()
            .filter_map(|v| self.parse_date(v.to_text().trim()))
            .collect();

        let min = parsed.iter().min();
        let max = parsed.iter().max();

        let date_range_days = match (min, max) {
            (Some(first), Some(last)) if parsed.len() >= 2 => {
                last.signed_duration_since(*first).num_days()
            }
            _ => 0,
        };

        DateStatistics {
            min_date: min.map(|d| d.format(DATE_OUTPUT_FORMAT).to_string()),
            max_date: max.map(|d| d.format(DATE_OUTPUT_FORMAT).to_string()),
            date_range_days,
        }
    }

    /// Parse a date cell with the configured formats.
    pub fn parse_date(&self, value: &str) -> Option<NaiveDateTime> {
        if value.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.naive_utc());
        }
        for format in &self.config.date_formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
                return Some(dt);
            }
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return date.and_hms_opt(0, 0, 0);
            }
        }
        let caps = YEAR_MONTH.captures(value)?;
        let year = caps[1].parse::<i32>().ok()?;
        let month = caps[2].parse::<u32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
    }
}

fn numeric_statistics(values: &[&RawValue]) -> Option<NumericStatistics> {
    let numbers: Vec<f64> = values.iter().filter_map(|v| v.to_number()).collect();
    if numbers.is_empty() {
        return None;
    }

    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = numbers.iter().sum();
    let avg = (sum / numbers.len() as f64).clamp(min, max);

    // Round every figure so the rounded avg stays within [min, max].
    Some(NumericStatistics {
        min: round2(min),
        max: round2(max),
        sum: round2(sum),
        avg: round2(avg),
    })
}

fn boolean_statistics(values: &[&RawValue]) -> BooleanStatistics {
    let true_count = values
        .iter()
        .filter(|v| TRUTHY.contains(&v.to_text().trim().to_lowercase().as_str()))
        .count();
    let false_count = values.len() - true_count;
    let true_percentage = if values.is_empty() {
        0.0
    } else {
        round2(true_count as f64 / values.len() as f64 * 100.0)
    };

    BooleanStatistics {
        true_count,
        false_count,
        true_percentage,
    }
}
