//! Widget aggregation: filter, group, reduce and pivot raw rows into the
//! series a chart needs.
//!
//! The payload shape is chosen by the number of selected columns and whether
//! an aggregation is set:
//!
//! | columns | aggregation | payload |
//! |---------|-------------|---------|
//! | 1+      | none        | table preview |
//! | 1       | COUNT       | histogram (text) or row count (numeric) |
//! | 1       | other       | scalar |
//! | 2       | any         | grouped series |
//! | 3       | any         | pivot, one series per group value |
//!
//! Missing columns and malformed values never produce an error; they fall
//! through to the neutral empty payload or to zero.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::reduce::Accumulator;
use super::types::{Filters, ScalarValue, SeriesDataset, Widget, WidgetPayload};
use crate::error::{Result, TabulaError};
use crate::input::{cell, Dataset, RawValue, Row, ValueKey};
use crate::profile::round2;
use crate::schema::Aggregation;

/// Aggregator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Rows returned by the table preview.
    pub preview_rows: usize,
    /// Serve unaggregated requests as a table preview regardless of arity.
    /// When off, two columns yield raw label/value pairs and three columns
    /// pivot with SUM.
    pub preview_unaggregated: bool,
    /// Refuse datasets larger than this before grouping (None = unbounded).
    pub max_rows: Option<usize>,
    /// Refuse pivots with more x-by-group cells than this (None = unbounded).
    pub max_pivot_cells: Option<usize>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            preview_rows: 100,
            preview_unaggregated: true,
            max_rows: Some(1_000_000),
            max_pivot_cells: Some(1_000_000),
        }
    }
}

/// Computes widget payloads from datasets.
#[derive(Debug, Clone, Default)]
pub struct WidgetAggregator {
    config: AggregatorConfig,
}

impl WidgetAggregator {
    /// Create an aggregator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an aggregator with custom configuration.
    pub fn with_config(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregate the data a widget displays.
    pub fn aggregate_widget(&self, dataset: &Dataset, widget: &Widget) -> Result<WidgetPayload> {
        self.aggregate(
            dataset,
            &widget.columns,
            widget.aggregation,
            widget.filters.as_ref(),
        )
    }

    /// Aggregate `columns` of `dataset`.
    ///
    /// Errors only when a budget is exceeded: [`TabulaError::LimitExceeded`]
    /// for a dataset over `max_rows`, [`TabulaError::PivotTooLarge`] for a
    /// pivot over `max_pivot_cells`.
    pub fn aggregate<S: AsRef<str>>(
        &self,
        dataset: &Dataset,
        columns: &[S],
        aggregation: Option<Aggregation>,
        filters: Option<&Filters>,
    ) -> Result<WidgetPayload> {
        if dataset.is_empty() {
            return Ok(WidgetPayload::empty());
        }

        if let Some(limit) = self.config.max_rows {
            if dataset.row_count() > limit {
                return Err(TabulaError::LimitExceeded {
                    rows: dataset.row_count(),
                    limit,
                });
            }
        }

        let columns: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
        let rows = apply_filters(dataset, filters);

        debug!(
            dataset = %dataset.name,
            columns = ?columns,
            aggregation = ?aggregation,
            rows = rows.len(),
            "aggregating widget"
        );

        let aggregation = match aggregation {
            None if self.config.preview_unaggregated && !columns.is_empty() => {
                return Ok(self.preview(dataset, &rows, &columns));
            }
            other => other,
        };

        if rows.is_empty() {
            return Ok(WidgetPayload::empty());
        }

        let payload = match (columns.as_slice(), aggregation) {
            (&[column], Some(aggregation)) => scalar_or_histogram(dataset, &rows, column, aggregation),
            (&[column], None) => self.preview(dataset, &rows, &[column]),
            (&[x, y], Some(aggregation)) if dataset.has_column(x) && dataset.has_column(y) => {
                grouped_series(&rows, x, y, aggregation)
            }
            (&[x, y], None) if dataset.has_column(x) && dataset.has_column(y) => paired_series(&rows, x, y),
            (&[x, group, y], aggregation)
                if dataset.has_column(x) && dataset.has_column(group) && dataset.has_column(y) =>
            {
                pivot(
                    &rows,
                    x,
                    group,
                    y,
                    aggregation.unwrap_or(Aggregation::Sum),
                    self.config.max_pivot_cells,
                )?
            }
            _ => WidgetPayload::empty(),
        };

        Ok(payload)
    }

    /// First rows restricted to the selected columns the dataset carries.
    fn preview(&self, dataset: &Dataset, rows: &[&Row], columns: &[&str]) -> WidgetPayload {
        let selected: Vec<&str> = columns
            .iter()
            .copied()
            .filter(|c| dataset.has_column(c))
            .collect();

        if selected.is_empty() {
            return WidgetPayload::Table {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows: Vec::new(),
            };
        }

        let table_rows = rows
            .iter()
            .take(self.config.preview_rows)
            .map(|row| selected.iter().map(|c| cell(row, c).clone()).collect())
            .collect();

        WidgetPayload::Table {
            columns: selected.iter().map(|c| c.to_string()).collect(),
            rows: table_rows,
        }
    }
}

/// Keep rows matching every filter on a column the dataset has.
fn apply_filters<'a>(dataset: &'a Dataset, filters: Option<&Filters>) -> Vec<&'a Row> {
    let active: Vec<(&str, &RawValue)> = filters
        .into_iter()
        .flatten()
        .filter(|(column, _)| dataset.has_column(column))
        .map(|(column, value)| (column.as_str(), value))
        .collect();

    dataset
        .rows
        .iter()
        .filter(|row| active.iter().all(|(column, value)| cell(row, column).matches(value)))
        .collect()
}

/// One-column aggregation.
fn scalar_or_histogram(
    dataset: &Dataset,
    rows: &[&Row],
    column: &str,
    aggregation: Aggregation,
) -> WidgetPayload {
    if !dataset.has_column(column) {
        return WidgetPayload::Scalar {
            value: ScalarValue::Integer(0),
            label: column.to_string(),
        };
    }

    if aggregation == Aggregation::Count {
        if is_numeric_column(rows, column) {
            return WidgetPayload::Scalar {
                value: ScalarValue::Integer(rows.len() as i64),
                label: column.to_string(),
            };
        }
        return histogram(rows, column);
    }

    let mut acc = Accumulator::default();
    for row in rows {
        acc.push(cell(row, column));
    }

    WidgetPayload::Scalar {
        value: ScalarValue::Float(round2(acc.finish(aggregation))),
        label: column.to_string(),
    }
}

/// Whether the column's runtime values are all numbers, or all booleans.
fn is_numeric_column(rows: &[&Row], column: &str) -> bool {
    let mut present = rows
        .iter()
        .map(|row| cell(row, column))
        .filter(|v| !v.is_missing())
        .peekable();

    match present.peek() {
        None => false,
        Some(RawValue::Boolean(_)) => present.all(|v| matches!(v, RawValue::Boolean(_))),
        Some(_) => present.all(RawValue::is_number),
    }
}

/// Value frequencies, most frequent first, ties in first-seen order.
fn histogram(rows: &[&Row], column: &str) -> WidgetPayload {
    let mut counts: IndexMap<ValueKey, (RawValue, usize)> = IndexMap::new();
    for row in rows {
        let value = cell(row, column);
        if value.is_missing() {
            continue;
        }
        counts
            .entry(value.key())
            .or_insert_with(|| (value.clone(), 0))
            .1 += 1;
    }

    let mut entries: Vec<(RawValue, usize)> = counts.into_values().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    let (labels, data): (Vec<RawValue>, Vec<RawValue>) = entries
        .into_iter()
        .map(|(value, count)| (value, RawValue::Number(count as f64)))
        .unzip();

    WidgetPayload::Series { labels, data }
}

/// Group by `x` (first-seen order) and reduce `y` within each group.
fn grouped_series(rows: &[&Row], x: &str, y: &str, aggregation: Aggregation) -> WidgetPayload {
    let mut groups: IndexMap<ValueKey, (RawValue, Accumulator)> = IndexMap::new();
    for row in rows {
        let key = cell(row, x);
        if key.is_missing() {
            continue;
        }
        groups
            .entry(key.key())
            .or_insert_with(|| (key.clone(), Accumulator::default()))
            .1
            .push(cell(row, y));
    }

    let (labels, data): (Vec<RawValue>, Vec<RawValue>) = groups
        .into_values()
        .map(|(label, acc)| (label, RawValue::Number(round2(acc.finish(aggregation)))))
        .unzip();

    WidgetPayload::Series { labels, data }
}

/// Raw `x`/`y` pairs, one per row, in row order.
fn paired_series(rows: &[&Row], x: &str, y: &str) -> WidgetPayload {
    let (labels, data): (Vec<RawValue>, Vec<RawValue>) = rows
        .iter()
        .map(|row| (cell(row, x).clone(), cell(row, y).clone()))
        .unzip();

    WidgetPayload::Series { labels, data }
}

/// Group by `(x, group)`, reduce `y`, and pivot into one series per group.
///
/// Both axes keep first-seen order. Every `(x, group)` cell absent from the
/// data reads as 0. The cell count is checked against `max_cells` before
/// the zero-filled series are materialized.
fn pivot(
    rows: &[&Row],
    x: &str,
    group: &str,
    y: &str,
    aggregation: Aggregation,
    max_cells: Option<usize>,
) -> Result<WidgetPayload> {
    let mut x_values: IndexMap<ValueKey, RawValue> = IndexMap::new();
    let mut group_values: IndexMap<ValueKey, RawValue> = IndexMap::new();
    let mut cells: IndexMap<(ValueKey, ValueKey), Accumulator> = IndexMap::new();

    for row in rows {
        let (x_value, group_value) = (cell(row, x), cell(row, group));
        if x_value.is_missing() || group_value.is_missing() {
            continue;
        }
        let (x_key, group_key) = (x_value.key(), group_value.key());
        x_values
            .entry(x_key.clone())
            .or_insert_with(|| x_value.clone());
        group_values
            .entry(group_key.clone())
            .or_insert_with(|| group_value.clone());
        cells
            .entry((x_key, group_key))
            .or_default()
            .push(cell(row, y));
    }

    let total = x_values.len().saturating_mul(group_values.len());
    if let Some(limit) = max_cells {
        if total > limit {
            return Err(TabulaError::PivotTooLarge { cells: total, limit });
        }
    }

    let datasets = group_values
        .iter()
        .map(|(group_key, group_value)| SeriesDataset {
            label: group_value.to_text(),
            data: x_values
                .keys()
                .map(|x_key| {
                    cells
                        .get(&(x_key.clone(), group_key.clone()))
                        .map(|acc| RawValue::Number(round2(acc.finish(aggregation))))
                        .unwrap_or(RawValue::Number(0.0))
                })
                .collect(),
        })
        .collect();

    Ok(WidgetPayload::Pivot {
        labels: x_values.into_values().collect(),
        datasets,
    })
}
