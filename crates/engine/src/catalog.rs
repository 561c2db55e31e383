//! Metric definition lookup.

use pvmetrics_core::metric::{MetricDefinition, MetricDefinitions};

use crate::error::StoreResult;
use crate::store::{MetricCatalogStore, MetricRef};

/// Resolves the configured metric definitions to stored references.
///
/// Every lookup is a get-or-create against the store, so a fresh database
/// is populated on first use and later runs reuse the same rows.
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    definitions: MetricDefinitions,
}

impl MetricCatalog {
    pub fn new(definitions: MetricDefinitions) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &MetricDefinitions {
        &self.definitions
    }

    /// Get or create `definition`. The stored description of an existing
    /// metric is left as it is.
    pub async fn get_or_create<S: MetricCatalogStore>(
        &self,
        store: &S,
        definition: &MetricDefinition,
    ) -> StoreResult<MetricRef> {
        store
            .get_or_create_metric(&definition.name, &definition.description)
            .await
    }

    pub async fn latest<S: MetricCatalogStore>(&self, store: &S) -> StoreResult<MetricRef> {
        self.get_or_create(store, &self.definitions.latest).await
    }

    pub async fn latest_all_sites<S: MetricCatalogStore>(
        &self,
        store: &S,
    ) -> StoreResult<MetricRef> {
        self.get_or_create(store, &self.definitions.latest_all_sites)
            .await
    }

    pub async fn revision<S: MetricCatalogStore>(&self, store: &S) -> StoreResult<MetricRef> {
        self.get_or_create(store, &self.definitions.revision).await
    }

    /// Make sure every configured definition exists, returning their
    /// references in definition order.
    pub async fn ensure_all<S: MetricCatalogStore>(&self, store: &S) -> StoreResult<Vec<MetricRef>> {
        let mut refs = Vec::new();
        for definition in self.definitions.iter() {
            let metric = self.get_or_create(store, definition).await?;
            tracing::debug!(metric_id = metric.id, name = %metric.name, "Metric definition ready");
            refs.push(metric);
        }
        Ok(refs)
    }
}
