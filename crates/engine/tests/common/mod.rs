//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use parking_lot::Mutex;
use pvmetrics_core::forecast::ForecastValue;
use pvmetrics_core::interval::DatetimeInterval;
use pvmetrics_core::observation::{Observation, Regime};
use pvmetrics_core::types::{DbId, SiteId, Timestamp};
use pvmetrics_engine::store::{
    ForecastStore, IntervalRef, LocationRef, LocationResolver, MetricCatalogStore, MetricRef,
    MetricValueWriter, NewMetricValue, ObservationStore,
};
use pvmetrics_engine::{InMemoryStore, StoreError, StoreResult};

// ---------------------------------------------------------------------------
// Time helpers
// ---------------------------------------------------------------------------

pub fn at(h: u32, m: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2022, 1, 1, h, m, 0).unwrap()
}

pub fn day_start() -> Timestamp {
    at(0, 0)
}

pub fn day_end() -> Timestamp {
    Utc.with_ymd_and_hms(2022, 1, 2, 0, 0, 0).unwrap()
}

pub fn day() -> DatetimeInterval {
    DatetimeInterval::new(day_start(), day_end()).unwrap()
}

// ---------------------------------------------------------------------------
// Row builders
// ---------------------------------------------------------------------------

pub fn observation(site_id: SiteId, timestamp: Timestamp, value_kw: f64, regime: Regime) -> Observation {
    Observation {
        site_id,
        timestamp,
        value_kw,
        regime,
    }
}

pub fn forecast(
    site_id: SiteId,
    target_time: Timestamp,
    minutes_ahead: i64,
    value_mw: f64,
) -> ForecastValue {
    ForecastValue {
        site_id,
        target_time,
        created_time: target_time - Duration::minutes(minutes_ahead),
        value_mw,
    }
}

// ---------------------------------------------------------------------------
// Standard day
// ---------------------------------------------------------------------------

/// Sites `0..=max_site_id`, each with:
///
/// - settled ground truth of 1000 kW at 00:30 and 01:00,
/// - latest forecasts of 1 MW at 00:30 and 4 MW at 01:00,
/// - historic forecasts made 15 and 45 minutes ahead, valued at the latest
///   forecast plus `minutes_ahead / 60` MW.
pub fn seeded_store(max_site_id: SiteId) -> InMemoryStore {
    let store = InMemoryStore::new();
    for site_id in 0..=max_site_id {
        seed_site(&store, site_id);
    }
    store
}

pub fn seed_site(store: &InMemoryStore, site_id: SiteId) {
    for (target, base_mw) in [(at(0, 30), 1.0), (at(1, 0), 4.0)] {
        store.add_observation(observation(site_id, target, 1000.0, Regime::DayAfter));
        store.upsert_latest_forecast(forecast(site_id, target, 5, base_mw));
        for minutes_ahead in [15, 45] {
            store.add_forecast(forecast(
                site_id,
                target,
                minutes_ahead,
                base_mw + minutes_ahead as f64 / 60.0,
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Failing store
// ---------------------------------------------------------------------------

/// Wraps an [`InMemoryStore`] and fails every read for the listed sites,
/// and every metric value write once `fail_writes` is set.
pub struct FlakyStore {
    pub inner: InMemoryStore,
    failing_sites: Vec<SiteId>,
    fail_writes: Mutex<bool>,
}

impl FlakyStore {
    pub fn new(inner: InMemoryStore, failing_sites: Vec<SiteId>) -> Self {
        Self {
            inner,
            failing_sites,
            fail_writes: Mutex::new(false),
        }
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    fn check(&self, site_id: Option<SiteId>) -> StoreResult<()> {
        match site_id {
            Some(site_id) if self.failing_sites.contains(&site_id) => Err(
                StoreError::Unavailable(format!("site {site_id} is offline")),
            ),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ObservationStore for FlakyStore {
    async fn observations(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
        regime: Regime,
    ) -> StoreResult<Vec<Observation>> {
        self.check(site_id)?;
        self.inner.observations(site_id, interval, regime).await
    }
}

#[async_trait]
impl ForecastStore for FlakyStore {
    async fn forecast_values(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
    ) -> StoreResult<Vec<ForecastValue>> {
        self.check(site_id)?;
        self.inner.forecast_values(site_id, interval).await
    }

    async fn latest_forecast_values(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
    ) -> StoreResult<Vec<ForecastValue>> {
        self.check(site_id)?;
        self.inner.latest_forecast_values(site_id, interval).await
    }
}

#[async_trait]
impl LocationResolver for FlakyStore {
    async fn resolve_location(&self, site_id: SiteId) -> StoreResult<LocationRef> {
        self.inner.resolve_location(site_id).await
    }
}

#[async_trait]
impl MetricCatalogStore for FlakyStore {
    async fn get_or_create_metric(&self, name: &str, description: &str) -> StoreResult<MetricRef> {
        self.inner.get_or_create_metric(name, description).await
    }

    async fn get_or_create_interval(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<IntervalRef> {
        self.inner.get_or_create_interval(start, end).await
    }
}

#[async_trait]
impl MetricValueWriter for FlakyStore {
    async fn insert_metric_value(&self, value: NewMetricValue) -> StoreResult<DbId> {
        let failing = *self.fail_writes.lock();
        if failing {
            return Err(StoreError::Unavailable("metric value writes disabled".into()));
        }
        self.inner.insert_metric_value(value).await
    }
}
