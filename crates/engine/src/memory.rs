//! In-memory store implementation.
//!
//! Implements every store trait over plain collections, for tests and local
//! development. Rows are kept in insertion order, which is the "store order"
//! horizon selection falls back to on exact ties.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use pvmetrics_core::forecast::{filter_forecasts, ForecastValue};
use pvmetrics_core::interval::DatetimeInterval;
use pvmetrics_core::observation::{filter_observations, Observation, Regime};
use pvmetrics_core::types::{DbId, SiteId, Timestamp};

use crate::error::StoreResult;
use crate::store::{
    ForecastStore, IntervalRef, LocationRef, LocationResolver, MetricCatalogStore, MetricRef,
    MetricValueWriter, NewMetricValue, ObservationStore,
};

/// A metric value as held by [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMetricValue {
    pub id: DbId,
    pub value: NewMetricValue,
}

/// In-memory store.
///
/// Cloning is cheap and clones share the same data.
///
/// # Example
/// ```
/// use pvmetrics_engine::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// assert!(store.metric_values().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Default)]
struct MemoryData {
    observations: Vec<Observation>,
    forecasts: Vec<ForecastValue>,
    latest: BTreeMap<(SiteId, Timestamp), ForecastValue>,

    locations: BTreeMap<SiteId, LocationRef>,
    metrics: Vec<(MetricRef, String)>,
    intervals: Vec<(IntervalRef, Timestamp, Timestamp)>,
    metric_values: Vec<StoredMetricValue>,

    next_id: DbId,
}

impl MemoryData {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Fixture helpers
    // -----------------------------------------------------------------------

    /// Add one ground-truth reading.
    pub fn add_observation(&self, observation: Observation) {
        self.data.write().observations.push(observation);
    }

    /// Add a forecast to the history only.
    pub fn add_forecast(&self, forecast: ForecastValue) {
        self.data.write().forecasts.push(forecast);
    }

    /// Set the latest forecast for its site and target time.
    ///
    /// A stored forecast is only replaced by one created at the same time or
    /// later. Returns whether the forecast was stored.
    pub fn upsert_latest_forecast(&self, forecast: ForecastValue) -> bool {
        let mut data = self.data.write();
        let key = (forecast.site_id, forecast.target_time);
        let newer_stored = data
            .latest
            .get(&key)
            .is_some_and(|current| current.created_time > forecast.created_time);
        if newer_stored {
            return false;
        }
        data.latest.insert(key, forecast);
        true
    }

    /// Add a forecast to the history and offer it as the latest.
    pub fn record_forecast(&self, forecast: ForecastValue) {
        self.add_forecast(forecast.clone());
        self.upsert_latest_forecast(forecast);
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Every metric value written so far, in insertion order.
    pub fn metric_values(&self) -> Vec<StoredMetricValue> {
        self.data.read().metric_values.clone()
    }

    /// Metric values written against the metric called `name`.
    pub fn metric_values_named(&self, name: &str) -> Vec<StoredMetricValue> {
        let data = self.data.read();
        let Some((metric, _)) = data.metrics.iter().find(|(m, _)| m.name == name) else {
            return Vec::new();
        };
        data.metric_values
            .iter()
            .filter(|v| v.value.metric_id == metric.id)
            .cloned()
            .collect()
    }

    /// Number of distinct metric definitions stored.
    pub fn metric_count(&self) -> usize {
        self.data.read().metrics.len()
    }

    /// Number of distinct intervals stored.
    pub fn interval_count(&self) -> usize {
        self.data.read().intervals.len()
    }

    /// The location stored for `site_id`, if any value was attached to it.
    pub fn location(&self, site_id: SiteId) -> Option<LocationRef> {
        self.data.read().locations.get(&site_id).cloned()
    }
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl ObservationStore for InMemoryStore {
    async fn observations(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
        regime: Regime,
    ) -> StoreResult<Vec<Observation>> {
        let data = self.data.read();
        Ok(filter_observations(&data.observations, interval, site_id, regime))
    }
}

#[async_trait]
impl ForecastStore for InMemoryStore {
    async fn forecast_values(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
    ) -> StoreResult<Vec<ForecastValue>> {
        let data = self.data.read();
        Ok(filter_forecasts(&data.forecasts, interval, site_id))
    }

    async fn latest_forecast_values(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
    ) -> StoreResult<Vec<ForecastValue>> {
        let data = self.data.read();
        Ok(filter_forecasts(data.latest.values(), interval, site_id))
    }
}

#[async_trait]
impl LocationResolver for InMemoryStore {
    async fn resolve_location(&self, site_id: SiteId) -> StoreResult<LocationRef> {
        let mut data = self.data.write();
        if let Some(location) = data.locations.get(&site_id) {
            return Ok(location.clone());
        }
        let location = LocationRef {
            id: data.allocate_id(),
            site_id,
        };
        data.locations.insert(site_id, location.clone());
        Ok(location)
    }
}

#[async_trait]
impl MetricCatalogStore for InMemoryStore {
    async fn get_or_create_metric(&self, name: &str, description: &str) -> StoreResult<MetricRef> {
        let mut data = self.data.write();
        if let Some((metric, _)) = data.metrics.iter().find(|(m, _)| m.name == name) {
            return Ok(metric.clone());
        }
        let metric = MetricRef {
            id: data.allocate_id(),
            name: name.to_string(),
        };
        data.metrics.push((metric.clone(), description.to_string()));
        Ok(metric)
    }

    async fn get_or_create_interval(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<IntervalRef> {
        let mut data = self.data.write();
        if let Some((interval, _, _)) = data
            .intervals
            .iter()
            .find(|(_, s, e)| *s == start && *e == end)
        {
            return Ok(*interval);
        }
        let interval = IntervalRef {
            id: data.allocate_id(),
        };
        data.intervals.push((interval, start, end));
        Ok(interval)
    }
}

#[async_trait]
impl MetricValueWriter for InMemoryStore {
    async fn insert_metric_value(&self, value: NewMetricValue) -> StoreResult<DbId> {
        let mut data = self.data.write();
        let id = data.allocate_id();
        data.metric_values.push(StoredMetricValue { id, value });
        Ok(id)
    }
}
