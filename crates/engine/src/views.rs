//! Reading sets the MAE partitions are computed over.
//!
//! Each view fetches rows through a store trait, applies the selection rule
//! for its partition kind and returns [`Reading`]s in MW, ready for
//! [`mean_absolute_error`](pvmetrics_core::mae::mean_absolute_error).

use pvmetrics_core::forecast::{latest_per_target, select_horizon_bucket, HorizonBucket};
use pvmetrics_core::interval::DatetimeInterval;
use pvmetrics_core::mae::Reading;
use pvmetrics_core::observation::{Observation, Regime};
use pvmetrics_core::types::{SiteId, NATIONAL_SITE_ID};

use crate::error::StoreResult;
use crate::store::{ForecastStore, ObservationStore};

/// Settled (day-after) ground truth for one site, or every site when
/// `site_id` is `None`.
pub async fn ground_truth_view<S: ObservationStore>(
    store: &S,
    interval: &DatetimeInterval,
    site_id: Option<SiteId>,
) -> StoreResult<Vec<Reading>> {
    regime_view(store, interval, site_id, Regime::DayAfter).await
}

/// Settled ground truth for every site except the national aggregate.
pub async fn regional_ground_truth_view<S: ObservationStore>(
    store: &S,
    interval: &DatetimeInterval,
) -> StoreResult<Vec<Reading>> {
    let readings = ground_truth_view(store, interval, None).await?;
    Ok(readings
        .into_iter()
        .filter(|r| r.site_id != NATIONAL_SITE_ID)
        .collect())
}

/// Ground truth of one regime for one site, or every site.
pub async fn regime_view<S: ObservationStore>(
    store: &S,
    interval: &DatetimeInterval,
    site_id: Option<SiteId>,
    regime: Regime,
) -> StoreResult<Vec<Reading>> {
    let rows = store.observations(site_id, interval, regime).await?;
    Ok(rows.iter().map(Observation::to_reading).collect())
}

/// The two ground-truth estimates of one site, to be joined on timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionPair {
    pub in_day: Vec<Reading>,
    pub day_after: Vec<Reading>,
}

pub async fn revision_pair<S: ObservationStore>(
    store: &S,
    interval: &DatetimeInterval,
    site_id: SiteId,
) -> StoreResult<RevisionPair> {
    let in_day = regime_view(store, interval, Some(site_id), Regime::InDay).await?;
    let day_after = regime_view(store, interval, Some(site_id), Regime::DayAfter).await?;
    Ok(RevisionPair { in_day, day_after })
}

/// Per target time, the forecast for `site_id` made `bucket` ahead.
///
/// See [`select_horizon_bucket`] for the tie-break rule.
pub async fn forecast_horizon_view<S: ForecastStore>(
    store: &S,
    interval: &DatetimeInterval,
    site_id: SiteId,
    bucket: HorizonBucket,
) -> StoreResult<Vec<Reading>> {
    let rows = store.forecast_values(Some(site_id), interval).await?;
    Ok(select_horizon_bucket(&rows, bucket)
        .iter()
        .map(|f| f.to_reading())
        .collect())
}

/// The most recent forecast per site and target time.
///
/// Stores already hold one latest row per key; collapsing again keeps the
/// one-row-per-target guarantee whatever the store returns.
pub async fn latest_forecast_view<S: ForecastStore>(
    store: &S,
    interval: &DatetimeInterval,
    site_id: Option<SiteId>,
) -> StoreResult<Vec<Reading>> {
    let rows = store.latest_forecast_values(site_id, interval).await?;
    Ok(latest_per_target(&rows)
        .iter()
        .map(|f| f.to_reading())
        .collect())
}
