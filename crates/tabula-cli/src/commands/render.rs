//! Render command - compute every widget of a dashboard.

use std::path::PathBuf;

use colored::Colorize;
use tabula::Dashboard;

use super::{engine, require_file};

pub fn run(
    dashboard: PathBuf,
    data: PathBuf,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&dashboard)?;
    require_file(&data)?;

    let engine = engine(config)?;
    let dashboard = Dashboard::load(&dashboard)?;
    let (dataset, _) = engine.load_dataset(&data)?;

    let rendered = engine.render(&dashboard, &dataset);

    for widget in rendered.widgets.iter().filter(|w| w.error.is_some()) {
        eprintln!(
            "{} widget {} ({}): {}",
            "Warning:".yellow().bold(),
            widget.position,
            widget.title,
            widget.error.as_deref().unwrap_or_default()
        );
    }

    println!("{}", serde_json::to_string_pretty(&rendered)?);

    Ok(())
}
