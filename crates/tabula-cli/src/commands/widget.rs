//! Widget command - compute the data behind one widget.

use std::path::PathBuf;

use tabula::{Aggregation, ChartType, RawValue, Widget};

use super::{engine, require_file};

pub fn run(
    data: PathBuf,
    chart: ChartType,
    columns: Vec<String>,
    aggregation: Option<Aggregation>,
    filters: Vec<String>,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&data)?;

    let engine = engine(config)?;
    let (dataset, _) = engine.load_dataset(&data)?;

    let title = columns.join(" / ");
    let mut widget = Widget::new(chart, title, columns);
    if let Some(aggregation) = aggregation {
        widget = widget.with_aggregation(aggregation);
    }
    for filter in &filters {
        let (column, value) = parse_filter(filter)?;
        widget = widget.with_filter(column, value);
    }

    let payload = engine.aggregate(&dataset, &widget)?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}

/// Parse `COL=VALUE`. Values are typed: number, then `true`/`false`, then text.
fn parse_filter(filter: &str) -> Result<(String, RawValue), String> {
    let (column, value) = filter
        .split_once('=')
        .ok_or_else(|| format!("Invalid filter: {}. Use COL=VALUE.", filter))?;

    let column = column.trim();
    if column.is_empty() {
        return Err(format!("Invalid filter: {}. Column name is empty.", filter));
    }

    let value = if let Ok(n) = value.parse::<f64>() {
        RawValue::Number(n)
    } else if let Ok(b) = value.parse::<bool>() {
        RawValue::Boolean(b)
    } else {
        RawValue::String(value.to_string())
    };

    Ok((column.to_string(), value))
}
