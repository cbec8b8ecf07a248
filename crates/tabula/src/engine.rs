//! Main engine: dataset analysis and dashboard rendering.

use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{owned, Catalog};
use crate::dashboard::{validate_dashboard, Dashboard, DashboardData, DashboardRenderer, RenderConfig};
use crate::error::{Result, TabulaError};
use crate::input::{Dataset, Parser, ParserConfig, SourceMetadata};
use crate::profile::{ClassifierConfig, ColumnClassifier, ColumnProfile};
use crate::schema::Template;
use crate::suggestion::{SuggestionEngine, VisualizationSuggestion};
use crate::widget::{AggregatorConfig, Widget, WidgetAggregator, WidgetIssue, WidgetPayload};

/// Configuration for the Tabula engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Parser configuration (not read from config files).
    #[serde(skip)]
    pub parser: ParserConfig,
    /// Column classifier configuration.
    pub classifier: ClassifierConfig,
    /// Widget aggregator configuration.
    pub aggregator: AggregatorConfig,
    /// Dashboard renderer configuration.
    pub render: RenderConfig,
}

impl EngineConfig {
    /// Load configuration from a JSON file; absent keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TabulaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content)
            .map_err(|e| TabulaError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Report produced by analyzing a dataset against its template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataProfile {
    /// Number of rows in the dataset.
    pub num_rows: usize,
    /// Number of template columns profiled.
    pub num_columns: usize,
    /// One profile per template column, in template order.
    pub column_analyses: Vec<ColumnProfile>,
    /// Suggested charts, highest priority first.
    pub visualization_suggestions: Vec<VisualizationSuggestion>,
}

/// The Tabula analysis and rendering engine.
///
/// Stateless: every call is a pure function of its arguments, so one engine
/// can serve concurrent requests.
pub struct Engine {
    config: EngineConfig,
    parser: Parser,
    classifier: ColumnClassifier,
    aggregator: WidgetAggregator,
    renderer: DashboardRenderer,
}

impl Engine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let classifier = ColumnClassifier::with_config(config.classifier.clone());
        let aggregator = WidgetAggregator::with_config(config.aggregator.clone());
        let renderer = DashboardRenderer::with_config(aggregator.clone(), config.render.clone());

        Self {
            config,
            parser,
            classifier,
            aggregator,
            renderer,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load a dataset from a CSV/TSV/JSON file.
    pub fn load_dataset(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Profile every template column of a dataset.
    ///
    /// Works on empty datasets too; the profiles then have zero counts.
    pub fn profile_columns(&self, dataset: &Dataset, template: &Template) -> Vec<ColumnProfile> {
        let columns: Vec<_> = template.columns.iter().collect();
        columns
            .par_iter()
            .map(|(name, column_type)| {
                self.classifier
                    .analyze_column(name, **column_type, dataset.column_values(name))
            })
            .collect()
    }

    /// Analyze a dataset: per-column statistics plus chart suggestions.
    pub fn analyze(&self, dataset: &Dataset, template: &Template) -> Result<DataProfile> {
        if dataset.is_empty() {
            return Err(TabulaError::EmptyData(format!(
                "dataset '{}' has no rows",
                dataset_label(dataset)
            )));
        }

        let column_analyses = self.profile_columns(dataset, template);
        let visualization_suggestions = SuggestionEngine::suggest(&column_analyses);

        debug!(
            dataset = %dataset_label(dataset),
            rows = dataset.row_count(),
            columns = column_analyses.len(),
            suggestions = visualization_suggestions.len(),
            "analyzed dataset"
        );

        Ok(DataProfile {
            num_rows: dataset.row_count(),
            num_columns: column_analyses.len(),
            column_analyses,
            visualization_suggestions,
        })
    }

    /// Aggregate a single widget.
    pub fn aggregate(&self, dataset: &Dataset, widget: &Widget) -> Result<WidgetPayload> {
        self.aggregator.aggregate_widget(dataset, widget)
    }

    /// Render every widget of a dashboard.
    pub fn render(&self, dashboard: &Dashboard, dataset: &Dataset) -> DashboardData {
        self.renderer.render(dashboard, dataset)
    }

    /// Check a dashboard's widgets against the dataset they will read.
    pub fn validate(
        &self,
        dashboard: &Dashboard,
        dataset: &Dataset,
        template: &Template,
    ) -> Vec<WidgetIssue> {
        let profiles = self.profile_columns(dataset, template);
        validate_dashboard(dashboard, &profiles)
    }

    /// Analyze a stored dataset owned by `caller`.
    pub fn analyze_stored(
        &self,
        catalog: &impl Catalog,
        data_id: &str,
        caller: &str,
    ) -> Result<DataProfile> {
        let dataset = owned(catalog.dataset(data_id), |d| d.owner.as_str(), "dataset", data_id, caller)?;
        let template = catalog
            .template(&dataset.template_id)
            .ok_or_else(|| TabulaError::not_found("template", dataset.template_id.as_str()))?;

        self.analyze(dataset, template)
    }

    /// Render a stored dashboard owned by `caller`.
    pub fn render_stored(
        &self,
        catalog: &impl Catalog,
        dashboard_id: &str,
        caller: &str,
    ) -> Result<DashboardData> {
        let dashboard = owned(
            catalog.dashboard(dashboard_id),
            |d| d.owner.as_str(),
            "dashboard",
            dashboard_id,
            caller,
        )?;
        let dataset = catalog
            .dataset(&dashboard.data_id)
            .ok_or_else(|| TabulaError::not_found("dataset", dashboard.data_id.as_str()))?;

        Ok(self.render(dashboard, dataset))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn dataset_label(dataset: &Dataset) -> &str {
    if dataset.name.is_empty() {
        &dataset.id
    } else {
        &dataset.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::schema::{Aggregation, ChartType, ColumnType};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn template() -> Template {
        Template::new("People")
            .with_id("t1")
            .with_owner("ana")
            .with_column("age", ColumnType::Number)
            .with_column("city", ColumnType::Text)
    }

    fn dataset() -> Dataset {
        Dataset::from_records(json!([
            {"age": 25, "city": "NY"},
            {"age": 35, "city": "NY"},
            {"age": 45, "city": "LA"},
        ]))
        .unwrap()
        .with_id("d1")
        .with_owner("ana")
        .with_template("t1")
    }

    #[test]
    fn test_analyze() {
        let profile = Engine::new().analyze(&dataset(), &template()).unwrap();

        assert_eq!(profile.num_rows, 3);
        assert_eq!(profile.num_columns, 2);
        assert_eq!(profile.column_analyses[0].column_name, "age");
        assert_eq!(profile.column_analyses[0].numeric().unwrap().avg, 35.0);
        assert!(profile.column_analyses[1].is_categorical());

        let charts: Vec<ChartType> = profile
            .visualization_suggestions
            .iter()
            .map(|s| s.chart_type)
            .collect();
        assert_eq!(charts, vec![ChartType::Kpi, ChartType::Bar, ChartType::Table]);
    }

    #[test]
    fn test_analyze_empty_dataset() {
        let err = Engine::new().analyze(&Dataset::default(), &template()).unwrap_err();
        assert!(matches!(err, TabulaError::EmptyData(_)));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_stored_lookups() {
        let engine = Engine::new();
        let catalog = MemoryCatalog::new()
            .with_template(template())
            .with_dataset(dataset())
            .with_dashboard(
                Dashboard::new("People")
                    .with_id("dash1")
                    .with_owner("ana")
                    .with_data("d1")
                    .with_widget(
                        Widget::new(ChartType::Kpi, "Avg age", ["age"]).with_aggregation(Aggregation::Avg),
                    ),
            );

        assert!(engine.analyze_stored(&catalog, "d1", "ana").is_ok());
        assert!(matches!(
            engine.analyze_stored(&catalog, "d1", "bo"),
            Err(TabulaError::Forbidden { .. })
        ));
        assert!(matches!(
            engine.analyze_stored(&catalog, "missing", "ana"),
            Err(TabulaError::NotFound { kind: "dataset", .. })
        ));

        let data = engine.render_stored(&catalog, "dash1", "ana").unwrap();
        assert_eq!(
            serde_json::to_value(&data.widgets[0].data).unwrap(),
            json!({"value": 35.0, "label": "age"})
        );
        assert!(matches!(
            engine.render_stored(&catalog, "dash1", "bo"),
            Err(TabulaError::Forbidden { kind: "dashboard", .. })
        ));
    }

    #[test]
    fn test_missing_template_reference() {
        let catalog = MemoryCatalog::new().with_dataset(dataset());
        let err = Engine::new().analyze_stored(&catalog, "d1", "ana").unwrap_err();
        assert_eq!(err.to_string(), "template not found: t1");
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"classifier": {{"categorical_threshold": 5}}, "render": {{"parallel": false}}}}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.classifier.categorical_threshold, 5);
        assert_eq!(config.classifier.sample_size, 5);
        assert!(!config.render.parallel);
        assert_eq!(config.aggregator.preview_rows, 100);
    }

    #[test]
    fn test_config_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = EngineConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TabulaError::Config(_)));
    }
}
