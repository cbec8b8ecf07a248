//! Template command - write a blank CSV for a template.

use std::path::PathBuf;

use colored::Colorize;
use tabula::Template;

use super::require_file;

pub fn run(file: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    require_file(&file)?;

    let template = Template::load(&file)?;
    let csv = template.blank_csv()?;

    let output_path = output.unwrap_or_else(|| {
        let mut p = file.clone();
        let stem = if template.name.is_empty() {
            p.file_stem().unwrap_or_default().to_string_lossy().into_owned()
        } else {
            template.name.clone()
        };
        p.set_file_name(format!("{}.csv", stem));
        p
    });

    std::fs::write(&output_path, csv)?;

    println!(
        "{} {} ({} columns)",
        "Blank CSV saved to".green(),
        output_path.display().to_string().white().bold(),
        template.column_count()
    );

    Ok(())
}
