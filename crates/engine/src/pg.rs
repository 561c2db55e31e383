//! Postgres-backed store.
//!
//! [`PgMetricsStore`] owns one transaction for a whole metric run. Every
//! store call runs inside its own savepoint, so a failing call is rolled
//! back on its own and the transaction stays usable for later partitions.
//! The caller decides whether to [`commit`](PgMetricsStore::commit) or
//! [`rollback`](PgMetricsStore::rollback) at the end.

use async_trait::async_trait;
use pvmetrics_core::forecast::ForecastValue;
use pvmetrics_core::interval::DatetimeInterval;
use pvmetrics_core::observation::{Observation, Regime};
use pvmetrics_core::types::{DbId, SiteId, Timestamp};
use pvmetrics_db::models::forecast_value::{ForecastValueLatest, ForecastValueRow};
use pvmetrics_db::models::gsp_yield::GspYield;
use pvmetrics_db::models::metric::CreateMetricValue;
use pvmetrics_db::repositories::{
    DatetimeIntervalRepo, ForecastValueLatestRepo, ForecastValueRepo, GspYieldRepo, LocationRepo,
    MetricRepo, MetricValueRepo,
};
use pvmetrics_db::DbPool;
use sqlx::{Acquire, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::store::{
    ForecastStore, IntervalRef, LocationRef, LocationResolver, MetricCatalogStore, MetricRef,
    MetricValueWriter, NewMetricValue, ObservationStore,
};

/// Store that reads and writes through one Postgres transaction.
pub struct PgMetricsStore {
    tx: Mutex<Transaction<'static, Postgres>>,
}

impl PgMetricsStore {
    /// Open the transaction a run will execute in.
    pub async fn begin(pool: &DbPool) -> StoreResult<Self> {
        let tx = pool.begin().await?;
        Ok(Self { tx: Mutex::new(tx) })
    }

    /// Commit everything written through this store.
    pub async fn commit(self) -> StoreResult<()> {
        self.tx.into_inner().commit().await?;
        Ok(())
    }

    /// Discard everything written through this store.
    pub async fn rollback(self) -> StoreResult<()> {
        self.tx.into_inner().rollback().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row conversions
// ---------------------------------------------------------------------------

fn observation_from_row(row: GspYield) -> StoreResult<Observation> {
    Ok(Observation {
        site_id: row.gsp_id,
        timestamp: row.datetime_utc,
        value_kw: row.solar_generation_kw,
        regime: row.regime.parse()?,
    })
}

fn forecast_from_history(row: ForecastValueRow) -> ForecastValue {
    ForecastValue {
        site_id: row.gsp_id,
        target_time: row.target_time,
        created_time: row.created_utc,
        value_mw: row.expected_power_generation_megawatts,
    }
}

fn forecast_from_latest(row: ForecastValueLatest) -> ForecastValue {
    ForecastValue {
        site_id: row.gsp_id,
        target_time: row.target_time,
        created_time: row.created_utc,
        value_mw: row.expected_power_generation_megawatts,
    }
}

// ---------------------------------------------------------------------------
// Trait implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl ObservationStore for PgMetricsStore {
    async fn observations(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
        regime: Regime,
    ) -> StoreResult<Vec<Observation>> {
        let mut tx = self.tx.lock().await;
        let mut savepoint = Acquire::begin(&mut *tx).await?;
        let rows = GspYieldRepo::list_in_interval(
            &mut *savepoint,
            site_id,
            interval.start(),
            interval.end(),
            regime.as_str(),
        )
        .await?;
        savepoint.commit().await?;

        rows.into_iter().map(observation_from_row).collect()
    }
}

#[async_trait]
impl ForecastStore for PgMetricsStore {
    async fn forecast_values(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
    ) -> StoreResult<Vec<ForecastValue>> {
        let mut tx = self.tx.lock().await;
        let mut savepoint = Acquire::begin(&mut *tx).await?;
        let rows = ForecastValueRepo::list_in_interval(
            &mut *savepoint,
            site_id,
            interval.start(),
            interval.end(),
        )
        .await?;
        savepoint.commit().await?;

        Ok(rows.into_iter().map(forecast_from_history).collect())
    }

    async fn latest_forecast_values(
        &self,
        site_id: Option<SiteId>,
        interval: &DatetimeInterval,
    ) -> StoreResult<Vec<ForecastValue>> {
        let mut tx = self.tx.lock().await;
        let mut savepoint = Acquire::begin(&mut *tx).await?;
        let rows = ForecastValueLatestRepo::list_in_interval(
            &mut *savepoint,
            site_id,
            interval.start(),
            interval.end(),
        )
        .await?;
        savepoint.commit().await?;

        Ok(rows.into_iter().map(forecast_from_latest).collect())
    }
}

#[async_trait]
impl LocationResolver for PgMetricsStore {
    async fn resolve_location(&self, site_id: SiteId) -> StoreResult<LocationRef> {
        let mut tx = self.tx.lock().await;
        let mut savepoint = Acquire::begin(&mut *tx).await?;
        let location = LocationRepo::get_or_create(&mut *savepoint, site_id).await?;
        savepoint.commit().await?;

        Ok(LocationRef {
            id: location.id,
            site_id: location.gsp_id,
        })
    }
}

#[async_trait]
impl MetricCatalogStore for PgMetricsStore {
    async fn get_or_create_metric(&self, name: &str, description: &str) -> StoreResult<MetricRef> {
        let mut tx = self.tx.lock().await;
        let mut savepoint = Acquire::begin(&mut *tx).await?;
        let metric = MetricRepo::get_or_create(&mut *savepoint, name, description).await?;
        savepoint.commit().await?;

        Ok(MetricRef {
            id: metric.id,
            name: metric.name,
        })
    }

    async fn get_or_create_interval(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<IntervalRef> {
        let mut tx = self.tx.lock().await;
        let mut savepoint = Acquire::begin(&mut *tx).await?;
        let interval = DatetimeIntervalRepo::get_or_create(&mut *savepoint, start, end).await?;
        savepoint.commit().await?;

        Ok(IntervalRef { id: interval.id })
    }
}

#[async_trait]
impl MetricValueWriter for PgMetricsStore {
    async fn insert_metric_value(&self, value: NewMetricValue) -> StoreResult<DbId> {
        let input = CreateMetricValue {
            value: value.value,
            number_of_data_points: value.sample_count,
            metric_id: value.metric_id,
            datetime_interval_id: value.interval_id,
            location_id: value.location_id,
            forecast_horizon_minutes: value.horizon_minutes,
        };

        let mut tx = self.tx.lock().await;
        let mut savepoint = Acquire::begin(&mut *tx).await?;
        let row = MetricValueRepo::insert(&mut *savepoint, &input).await?;
        savepoint.commit().await?;

        Ok(row.id)
    }
}
