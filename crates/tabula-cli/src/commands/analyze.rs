//! Analyze command - profile a dataset and suggest charts.

use std::path::PathBuf;

use colored::Colorize;
use tabula::profile::ColumnStatistics;
use tabula::{ColumnProfile, Template};

use super::{engine, require_file};

pub fn run(
    data: PathBuf,
    template: PathBuf,
    json_output: bool,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&data)?;
    require_file(&template)?;

    let engine = engine(config)?;
    let template = Template::load(&template)?;
    let (dataset, source) = engine.load_dataset(&data)?;
    let profile = engine.analyze(&dataset, &template)?;

    if let Some(ref path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&profile)?)?;
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        data.display().to_string().white()
    );
    println!(
        "{} rows, {} template columns ({} format, sha256 {})",
        profile.num_rows.to_string().white().bold(),
        profile.num_columns.to_string().white().bold(),
        source.format,
        source.short_hash()
    );

    let missing = template.missing_columns(&dataset);
    if !missing.is_empty() {
        println!(
            "{} {}",
            "Missing columns:".yellow().bold(),
            missing.join(", ")
        );
    }

    println!();
    println!("{}", "Columns:".yellow().bold());
    for column in &profile.column_analyses {
        println!(
            "  {:20} {:8} {:>6} null ({:.2}%)  {}",
            column.column_name,
            column.column_type.as_str(),
            column.null_count,
            column.null_percentage,
            summary(column).dimmed()
        );
        if verbose {
            if let Some(text) = column.text() {
                println!("  {:20} samples: {}", "", text.sample_values.join(", "));
            }
        }
    }

    println!();
    println!(
        "Generated {} suggestions",
        profile
            .visualization_suggestions
            .len()
            .to_string()
            .white()
            .bold()
    );
    for suggestion in &profile.visualization_suggestions {
        let aggregation = suggestion
            .aggregation
            .map(|a| format!(" [{}]", a))
            .unwrap_or_default();
        println!(
            "  {} {:12} {}{}",
            format!("P{}", suggestion.priority).cyan(),
            suggestion.chart_type.label(),
            suggestion.title.white(),
            aggregation
        );
        if verbose && !suggestion.description.is_empty() {
            println!("     {}", suggestion.description.dimmed());
        }
    }

    if let Some(path) = output {
        println!();
        println!(
            "{} {}",
            "Profile saved to".green(),
            path.display().to_string().white().bold()
        );
    }

    Ok(())
}

fn summary(column: &ColumnProfile) -> String {
    match &column.statistics {
        Some(ColumnStatistics::Numeric(s)) => {
            format!("min {} max {} sum {} avg {}", s.min, s.max, s.sum, s.avg)
        }
        Some(ColumnStatistics::Text(s)) => format!(
            "{} unique{}",
            s.unique_count,
            if s.is_categorical { ", categorical" } else { "" }
        ),
        Some(ColumnStatistics::Boolean(s)) => format!(
            "{} true / {} false ({:.2}% true)",
            s.true_count, s.false_count, s.true_percentage
        ),
        Some(ColumnStatistics::Date(s)) => format!(
            "{} to {} ({} days)",
            s.min_date.as_deref().unwrap_or("-"),
            s.max_date.as_deref().unwrap_or("-"),
            s.date_range_days
        ),
        None => String::new(),
    }
}
