//! Store traits the engine reads from and writes to.
//!
//! The engine never talks to a database directly. Reads go through
//! [`ObservationStore`] and [`ForecastStore`], writes through
//! [`MetricCatalogStore`], [`LocationResolver`] and [`MetricValueWriter`].
//! [`MetricsStore`] bundles all five and is implemented automatically.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust.

use async_trait::async_trait;
use pvmetrics_core::forecast::ForecastValue;
use pvmetrics_core::interval::DatetimeInterval;
use pvmetrics_core::observation::{Observation, Regime};
use pvmetrics_core::types::{DbId, SiteId, Timestamp};
use serde::Serialize;

use crate::error::StoreResult;

// ---------------------------------------------------------------------------
// References returned by the store
// ---------------------------------------------------------------------------

/// A resolved site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRef {
    pub id: DbId,
    pub site_id: SiteId,
}

/// A resolved metric definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRef {
    pub id: DbId,
    pub name: String,
}

/// A resolved time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntervalRef {
    pub id: DbId,
}

/// A metric value ready to be appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMetricValue {
    pub value: Option<f64>,
    pub sample_count: i64,
    pub metric_id: DbId,
    pub interval_id: DbId,
    pub location_id: Option<DbId>,
    pub horizon_minutes: Option<i32>,
}

// ---------------------------------------------------------------------------
// Read side
// ---------------------------------------------------------------------------

/// Read-only access to ground-truth readings.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Readings of `regime` stamped inside `interval` (bounds included), for
    /// one site or all sites when `site_id` is `None`.
    async fn observations(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
        regime: Regime,
    ) -> StoreResult<Vec<Observation>>;
}

/// Read-only access to forecasts.
#[async_trait]
pub trait ForecastStore: Send + Sync {
    /// Every stored forecast whose target time is inside `interval`.
    async fn forecast_values(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
    ) -> StoreResult<Vec<ForecastValue>>;

    /// The most recent forecast per site and target time inside `interval`.
    async fn latest_forecast_values(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
    ) -> StoreResult<Vec<ForecastValue>>;
}

// ---------------------------------------------------------------------------
// Write side
// ---------------------------------------------------------------------------

/// Resolves a site id to the location a metric value is attached to.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve_location(&self, site_id: SiteId) -> StoreResult<LocationRef>;
}

/// Get-or-create access to metric definitions and time windows.
///
/// Both operations must return the same reference for the same key on every
/// call and must never create duplicates, including under concurrent first
/// creation.
#[async_trait]
pub trait MetricCatalogStore: Send + Sync {
    async fn get_or_create_metric(&self, name: &str, description: &str) -> StoreResult<MetricRef>;

    async fn get_or_create_interval(&self, start: Timestamp, end: Timestamp)
        -> StoreResult<IntervalRef>;
}

/// Append-only writer for metric values.
#[async_trait]
pub trait MetricValueWriter: Send + Sync {
    /// Insert one new row and return its id. Never touches existing rows.
    async fn insert_metric_value(&self, value: NewMetricValue) -> StoreResult<DbId>;
}

/// Everything a metric run needs from its backing store.
pub trait MetricsStore:
    ObservationStore + ForecastStore + LocationResolver + MetricCatalogStore + MetricValueWriter
{
}

impl<T> MetricsStore for T where
    T: ObservationStore + ForecastStore + LocationResolver + MetricCatalogStore + MetricValueWriter
{
}
