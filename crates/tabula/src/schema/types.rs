//! Core vocabulary: column types, chart kinds and aggregation functions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared semantic type of a template column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Numeric measures.
    Number,
    /// Free or categorical text.
    #[serde(alias = "string")]
    Text,
    /// Dates and timestamps.
    #[serde(alias = "datetime")]
    Date,
    /// True/false flags.
    #[serde(alias = "bool")]
    Boolean,
}

impl ColumnType {
    /// Lowercase name as it appears in templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Number => "number",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of chart a widget renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    /// Single headline number.
    Kpi,
    Line,
    Bar,
    Area,
    Pie,
    /// Raw row preview.
    Table,
}

impl ChartType {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Kpi => "kpi",
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Area => "area",
            ChartType::Pie => "pie",
            ChartType::Table => "table",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ChartType::Kpi => "KPI",
            ChartType::Line => "Line Chart",
            ChartType::Bar => "Bar Chart",
            ChartType::Area => "Area Chart",
            ChartType::Pie => "Pie Chart",
            ChartType::Table => "Table",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kpi" => Ok(ChartType::Kpi),
            "line" => Ok(ChartType::Line),
            "bar" => Ok(ChartType::Bar),
            "area" => Ok(ChartType::Area),
            "pie" => Ok(ChartType::Pie),
            "table" => Ok(ChartType::Table),
            _ => Err(format!(
                "Unknown chart type: {}. Use kpi, line, bar, area, pie, or table.",
                s
            )),
        }
    }
}

/// Aggregation function applied by a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Count,
    Sum,
    #[serde(alias = "mean")]
    Avg,
    Min,
    Max,
}

impl Aggregation {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Count => "count",
            Aggregation::Sum => "sum",
            Aggregation::Avg => "avg",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" => Ok(Aggregation::Count),
            "sum" => Ok(Aggregation::Sum),
            "avg" | "mean" => Ok(Aggregation::Avg),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            _ => Err(format!(
                "Unknown aggregation: {}. Use count, sum, avg, min, or max.",
                s
            )),
        }
    }
}
