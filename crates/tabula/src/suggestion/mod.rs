//! Chart suggestions derived from column profiles.

mod generator;
mod suggestion;

pub use generator::SuggestionEngine;
pub use suggestion::VisualizationSuggestion;
