//! Materialized datasets: ordered rows of named cells.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::value::RawValue;

/// A single row: column name to raw value, in upload order.
pub type Row = IndexMap<String, RawValue>;

static NULL_VALUE: RawValue = RawValue::Null;

/// Rows uploaded against a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Identifier assigned by the store.
    #[serde(default)]
    pub id: String,
    /// Owning user.
    #[serde(default)]
    pub owner: String,
    /// Template the rows were uploaded against.
    #[serde(default)]
    pub template_id: String,
    /// Display name (usually the uploaded file name).
    #[serde(default)]
    pub name: String,
    /// Row data.
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset from rows.
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
            ..Self::default()
        }
    }

    /// Build a dataset from a JSON array of row objects.
    pub fn from_records(records: serde_json::Value) -> Result<Self> {
        let rows: Vec<Row> = serde_json::from_value(records)?;
        Ok(Self::new("", rows))
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

    /// Set the template reference.
    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = template_id.into();
        self
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All column names seen in any row, in first-seen order.
    pub fn columns(&self) -> IndexSet<&str> {
        self.rows
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }

    /// Whether any row carries the column.
    pub fn has_column(&self, name: &str) -> bool {
        self.rows.iter().any(|row| row.contains_key(name))
    }

    /// Values of a column, one per row; rows lacking the column yield null.
    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RawValue> + 'a {
        self.rows.iter().map(move |row| cell(row, name))
    }
}

/// Look up a cell, treating an absent key as null.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a RawValue {
    row.get(column).unwrap_or(&NULL_VALUE)
}
