//! Lookup of stored templates, datasets and dashboards by identifier.
//!
//! The engine never persists anything. Callers hand it a [`Catalog`]
//! backed by whatever store they use; [`MemoryCatalog`] is the in-process
//! implementation used by the CLI and tests.

use indexmap::IndexMap;

use crate::dashboard::Dashboard;
use crate::error::{Result, TabulaError};
use crate::input::Dataset;
use crate::schema::Template;

/// Read access to stored records.
pub trait Catalog {
    /// Look up a template.
    fn template(&self, id: &str) -> Option<&Template>;

    /// Look up a dataset.
    fn dataset(&self, id: &str) -> Option<&Dataset>;

    /// Look up a dashboard.
    fn dashboard(&self, id: &str) -> Option<&Dashboard>;
}

/// Resolve a record and check the caller owns it.
pub(crate) fn owned<'a, T>(
    record: Option<&'a T>,
    owner: impl Fn(&T) -> &str,
    kind: &'static str,
    id: &str,
    caller: &str,
) -> Result<&'a T> {
    let record = record.ok_or_else(|| TabulaError::not_found(kind, id))?;
    if owner(record) != caller {
        return Err(TabulaError::forbidden(kind, id));
    }
    Ok(record)
}

/// In-memory catalog keyed by record id.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    templates: IndexMap<String, Template>,
    datasets: IndexMap<String, Dataset>,
    dashboards: IndexMap<String, Dashboard>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a template under its id.
    pub fn insert_template(&mut self, template: Template) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Store a dataset under its id.
    pub fn insert_dataset(&mut self, dataset: Dataset) {
        self.datasets.insert(dataset.id.clone(), dataset);
    }

    /// Store a dashboard under its id.
    pub fn insert_dashboard(&mut self, dashboard: Dashboard) {
        self.dashboards.insert(dashboard.id.clone(), dashboard);
    }

    /// Add a template.
    pub fn with_template(mut self, template: Template) -> Self {
        self.insert_template(template);
        self
    }

    /// Add a dataset.
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.insert_dataset(dataset);
        self
    }

    /// Add a dashboard.
    pub fn with_dashboard(mut self, dashboard: Dashboard) -> Self {
        self.insert_dashboard(dashboard);
        self
    }
}

impl Catalog for MemoryCatalog {
    fn template(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.get(id)
    }

    fn dashboard(&self, id: &str) -> Option<&Dashboard> {
        self.dashboards.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let catalog = MemoryCatalog::new()
            .with_template(Template::new("t").with_id("t1"))
            .with_dataset(Dataset::default().with_id("d1"));

        assert!(catalog.template("t1").is_some());
        assert!(catalog.dataset("d1").is_some());
        assert!(catalog.dashboard("x").is_none());
    }

    #[test]
    fn test_owned() {
        let catalog = MemoryCatalog::new().with_dataset(Dataset::default().with_id("d1").with_owner("ana"));

        let found = owned(catalog.dataset("d1"), |d| d.owner.as_str(), "dataset", "d1", "ana");
        assert!(found.is_ok());

        let err = owned(catalog.dataset("d1"), |d| d.owner.as_str(), "dataset", "d1", "bo").unwrap_err();
        assert!(matches!(err, TabulaError::Forbidden { .. }));

        let err = owned(catalog.dataset("d2"), |d| d.owner.as_str(), "dataset", "d2", "ana").unwrap_err();
        assert!(matches!(err, TabulaError::NotFound { kind: "dataset", .. }));
    }
}
