//! CLI command implementations.

pub mod analyze;
pub mod render;
pub mod template;
pub mod validate;
pub mod widget;

use std::path::PathBuf;

use tabula::{Engine, EngineConfig};

/// Build an engine from an optional configuration file.
pub fn engine(config: Option<PathBuf>) -> Result<Engine, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    Ok(Engine::with_config(config))
}

/// Fail early with a readable message when an input file is missing.
pub fn require_file(path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    Ok(())
}
