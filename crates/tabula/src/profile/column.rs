//! Column profiles and their type-specific statistics.

use serde::{Deserialize, Serialize};

use crate::schema::ColumnType;

/// Derived per-column summary.
///
/// Always recomputed from the rows; nothing here is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub column_name: String,
    /// Declared type from the template.
    pub column_type: ColumnType,
    /// Number of rows inspected.
    pub total_count: usize,
    /// Rows holding a non-blank value.
    pub non_null_count: usize,
    /// Rows that are null, absent or blank.
    pub null_count: usize,
    /// Share of null rows, 0-100, rounded to 2 decimals.
    pub null_percentage: f64,
    /// Type-specific statistics, present when any non-null value exists.
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ColumnStatistics>,
}

impl ColumnProfile {
    /// Numeric statistics, if this is a number column with coercible values.
    pub fn numeric(&self) -> Option<&NumericStatistics> {
        match &self.statistics {
            Some(ColumnStatistics::Numeric(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Text statistics, if this is a text column with values.
    pub fn text(&self) -> Option<&TextStatistics> {
        match &self.statistics {
            Some(ColumnStatistics::Text(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Date statistics, if this is a date column with values.
    pub fn date(&self) -> Option<&DateStatistics> {
        match &self.statistics {
            Some(ColumnStatistics::Date(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Boolean statistics, if this is a boolean column with values.
    pub fn boolean(&self) -> Option<&BooleanStatistics> {
        match &self.statistics {
            Some(ColumnStatistics::Boolean(stats)) => Some(stats),
            _ => None,
        }
    }

    /// Whether this is a text column with few enough distinct values to
    /// act as a category.
    pub fn is_categorical(&self) -> bool {
        self.text().map(|t| t.is_categorical).unwrap_or(false)
    }
}

/// Type-specific statistics, flattened into the profile on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnStatistics {
    Numeric(NumericStatistics),
    Text(TextStatistics),
    Boolean(BooleanStatistics),
    Date(DateStatistics),
}

/// Statistics for number columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    pub min: f64,
    pub max: f64,
    /// Sum of the coercible values, rounded to 2 decimals.
    pub sum: f64,
    /// Mean of the coercible values, rounded to 2 decimals.
    pub avg: f64,
}

/// Statistics for text columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStatistics {
    /// Distinct non-null values.
    pub unique_count: usize,
    /// Up to a handful of distinct values, first-seen order.
    pub sample_values: Vec<String>,
    /// Whether `unique_count` is within the categorical threshold.
    pub is_categorical: bool,
}

/// Statistics for date columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateStatistics {
    /// Earliest parsed instant, `YYYY-MM-DD HH:MM:SS`.
    pub min_date: Option<String>,
    /// Latest parsed instant.
    pub max_date: Option<String>,
    /// Whole days between earliest and latest.
    pub date_range_days: i64,
}

/// Statistics for boolean columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BooleanStatistics {
    pub true_count: usize,
    pub false_count: usize,
    /// Share of true values among non-null rows.
    pub true_percentage: f64,
}
