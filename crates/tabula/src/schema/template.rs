//! User-defined templates: ordered column name to type mappings.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::ColumnType;
use crate::error::{Result, TabulaError};
use crate::input::Dataset;

/// Schema a dataset is uploaded against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Template {
    /// Identifier assigned by the store.
    #[serde(default)]
    pub id: String,
    /// Owning user.
    #[serde(default)]
    pub owner: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Column declarations, in display order.
    pub columns: IndexMap<String, ColumnType>,
}

impl Template {
    /// Create an empty template.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load a template from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TabulaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Add a column declaration.
    pub fn with_column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.insert(name.into(), column_type);
        self
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Declared type of a column.
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).copied()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Number of declared columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Template columns that no row of the dataset carries.
    pub fn missing_columns(&self, dataset: &Dataset) -> Vec<&str> {
        let present = dataset.columns();
        self.columns
            .keys()
            .map(String::as_str)
            .filter(|name| !present.contains(name))
            .collect()
    }

    /// Header-only CSV a user fills in before uploading.
    pub fn blank_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.columns.keys())?;
        let bytes = writer
            .into_inner()
            .map_err(|e| TabulaError::Config(format!("failed to flush CSV template: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| TabulaError::Config(format!("CSV template is not UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sales_template() -> Template {
        Template::new("Sales")
            .with_column("month", ColumnType::Date)
            .with_column("region", ColumnType::Text)
            .with_column("sales", ColumnType::Number)
    }

    #[test]
    fn test_column_order_preserved() {
        let template: Template = serde_json::from_value(json!({
            "name": "t",
            "columns": {"zeta": "number", "alpha": "text", "mid": "date"}
        }))
        .unwrap();
        assert_eq!(template.column_names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(template.column_type("mid"), Some(ColumnType::Date));
    }

    #[test]
    fn test_missing_columns() {
        let dataset = Dataset::from_records(json!([{"month": "2024-01", "sales": 3}])).unwrap();
        assert_eq!(sales_template().missing_columns(&dataset), vec!["region"]);
    }

    #[test]
    fn test_blank_csv() {
        assert_eq!(sales_template().blank_csv().unwrap(), "month,region,sales\n");
    }
}
