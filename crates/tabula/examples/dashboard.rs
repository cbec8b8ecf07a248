//! Build a small dashboard in code, analyze the data and render it.
//!
//! Run with: cargo run -p tabula --example dashboard

use serde_json::json;
use tabula::{Aggregation, ChartType, ColumnType, Dashboard, Dataset, Engine, Template, Widget};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let template = Template::new("Sales")
        .with_column("month", ColumnType::Date)
        .with_column("region", ColumnType::Text)
        .with_column("sales", ColumnType::Number);

    let dataset = Dataset::from_records(json!([
        {"month": "2024-01", "region": "East", "sales": 120},
        {"month": "2024-01", "region": "West", "sales": 80},
        {"month": "2024-02", "region": "East", "sales": 95},
        {"month": "2024-03", "region": "West", "sales": 140},
        {"month": "2024-03", "region": "East", "sales": null},
    ]))?;

    let engine = Engine::new();
    let profile = engine.analyze(&dataset, &template)?;

    println!("{} rows, {} columns", profile.num_rows, profile.num_columns);
    for suggestion in &profile.visualization_suggestions {
        println!("  [{}] {} - {}", suggestion.priority, suggestion.chart_type.label(), suggestion.title);
    }

    let dashboard = Dashboard::new("Sales overview")
        .with_widget(Widget::new(ChartType::Kpi, "Total sales", ["sales"]).with_aggregation(Aggregation::Sum))
        .with_widget(
            Widget::new(ChartType::Line, "Sales by region", ["month", "region", "sales"])
                .with_position(1)
                .with_aggregation(Aggregation::Sum),
        )
        .with_widget(
            Widget::new(ChartType::Bar, "East only", ["month", "sales"])
                .with_position(2)
                .with_aggregation(Aggregation::Sum)
                .with_filter("region", "East"),
        );

    let issues = engine.validate(&dashboard, &dataset, &template);
    for issue in &issues {
        println!("  {} widget {}: {}", issue.severity.label(), issue.position, issue.message);
    }

    let rendered = engine.render(&dashboard, &dataset);
    println!("{}", serde_json::to_string_pretty(&rendered)?);

    Ok(())
}
