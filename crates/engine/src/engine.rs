//! Per-partition MAE computations.
//!
//! Each method builds the two reading sets of its partition, runs the
//! aggregator, appends the result as one metric value and returns it.

use pvmetrics_core::forecast::HorizonBucket;
use pvmetrics_core::interval::DatetimeInterval;
use pvmetrics_core::mae::{mean_absolute_error, MaeResult};
use pvmetrics_core::types::{SiteId, NATIONAL_SITE_ID};

use crate::catalog::MetricCatalog;
use crate::error::StoreResult;
use crate::persistence::record_metric_value;
use crate::store::MetricsStore;
use crate::views;

/// Computes and records MAE partitions against one store.
pub struct MetricsEngine<'a, S> {
    store: &'a S,
    catalog: &'a MetricCatalog,
}

impl<'a, S: MetricsStore> MetricsEngine<'a, S> {
    pub fn new(store: &'a S, catalog: &'a MetricCatalog) -> Self {
        Self { store, catalog }
    }

    /// MAE of the latest forecast for `site_id` against settled ground
    /// truth. Recorded with the site attached.
    pub async fn latest_mae_for_site(
        &self,
        interval: &DatetimeInterval,
        site_id: SiteId,
    ) -> StoreResult<MaeResult> {
        let actual = views::ground_truth_view(self.store, interval, Some(site_id)).await?;
        let predicted = views::latest_forecast_view(self.store, interval, Some(site_id)).await?;
        let result = mean_absolute_error(&actual, &predicted);

        tracing::debug!(
            site_id,
            value = ?result.value,
            sample_count = result.sample_count,
            "Computed latest forecast MAE"
        );

        let metric = self.catalog.latest(self.store).await?;
        record_metric_value(self.store, result, &metric, interval, Some(site_id), None).await?;
        Ok(result)
    }

    /// MAE of the latest forecast across every site except the national
    /// one. Recorded without a site.
    pub async fn latest_mae_all_sites(&self, interval: &DatetimeInterval) -> StoreResult<MaeResult> {
        let actual = views::regional_ground_truth_view(self.store, interval).await?;
        let predicted: Vec<_> = views::latest_forecast_view(self.store, interval, None)
            .await?
            .into_iter()
            .filter(|r| r.site_id != NATIONAL_SITE_ID)
            .collect();
        let result = mean_absolute_error(&actual, &predicted);

        tracing::debug!(
            value = ?result.value,
            sample_count = result.sample_count,
            "Computed latest forecast MAE across all sites"
        );

        let metric = self.catalog.latest_all_sites(self.store).await?;
        record_metric_value(self.store, result, &metric, interval, None, None).await?;
        Ok(result)
    }

    /// MAE of the forecasts for `site_id` made between `horizon_minutes` and
    /// `horizon_minutes + step_minutes` ahead of their target time. Recorded
    /// with the horizon attached and no site.
    pub async fn horizon_mae(
        &self,
        interval: &DatetimeInterval,
        site_id: SiteId,
        horizon_minutes: i32,
        step_minutes: i32,
    ) -> StoreResult<MaeResult> {
        let bucket = HorizonBucket::new(horizon_minutes.into(), step_minutes.into())?;

        let actual = views::ground_truth_view(self.store, interval, Some(site_id)).await?;
        let predicted =
            views::forecast_horizon_view(self.store, interval, site_id, bucket).await?;
        let result = mean_absolute_error(&actual, &predicted);

        tracing::debug!(
            site_id,
            horizon_minutes,
            value = ?result.value,
            sample_count = result.sample_count,
            "Computed forecast horizon MAE"
        );

        let metric = self.catalog.latest(self.store).await?;
        record_metric_value(
            self.store,
            result,
            &metric,
            interval,
            None,
            Some(horizon_minutes),
        )
        .await?;
        Ok(result)
    }

    /// MAE between the in-day and day-after ground truth of `site_id`.
    /// Recorded with the site attached and no horizon.
    pub async fn revision_mae(
        &self,
        interval: &DatetimeInterval,
        site_id: SiteId,
    ) -> StoreResult<MaeResult> {
        let pair = views::revision_pair(self.store, interval, site_id).await?;
        let result = mean_absolute_error(&pair.day_after, &pair.in_day);

        tracing::debug!(
            site_id,
            value = ?result.value,
            sample_count = result.sample_count,
            "Computed ground truth revision MAE"
        );

        let metric = self.catalog.revision(self.store).await?;
        record_metric_value(self.store, result, &metric, interval, Some(site_id), None).await?;
        Ok(result)
    }
}
