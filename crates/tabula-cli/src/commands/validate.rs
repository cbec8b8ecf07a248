//! Validate command - check a dashboard against a dataset.

use std::path::PathBuf;

use colored::Colorize;
use tabula::widget::{has_errors, IssueSeverity};
use tabula::{Dashboard, Template};

use super::{engine, require_file};

pub fn run(
    dashboard: PathBuf,
    template: PathBuf,
    data: PathBuf,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&dashboard)?;
    require_file(&template)?;
    require_file(&data)?;

    let engine = engine(config)?;
    let dashboard = Dashboard::load(&dashboard)?;
    let template = Template::load(&template)?;
    let (dataset, _) = engine.load_dataset(&data)?;

    let issues = engine.validate(&dashboard, &dataset, &template);

    println!(
        "{} {} ({} widgets)",
        "Validating".cyan().bold(),
        dashboard.name.white(),
        dashboard.widgets.len()
    );

    if issues.is_empty() {
        println!("{}", "All widgets are valid.".green());
        return Ok(());
    }

    for issue in &issues {
        let label = match issue.severity {
            IssueSeverity::Error => issue.severity.label().red().bold(),
            IssueSeverity::Warning => issue.severity.label().yellow().bold(),
        };
        println!("  {} widget {}: {}", label, issue.position, issue.message);
    }

    if has_errors(&issues) {
        return Err(format!("{} issue(s) found", issues.len()).into());
    }

    Ok(())
}
