//! Append-only recording of computed metric values.

use pvmetrics_core::interval::DatetimeInterval;
use pvmetrics_core::mae::MaeResult;
use pvmetrics_core::types::{DbId, SiteId};

use crate::error::StoreResult;
use crate::store::{LocationResolver, MetricCatalogStore, MetricRef, MetricValueWriter, NewMetricValue};

/// Append one metric value for `metric` over `interval`.
///
/// The interval is resolved through get-or-create. The site is resolved only
/// when `site_id` is given; otherwise the value is stored without a location.
/// A result without data is still recorded, with a null value and a zero
/// sample count. Returns the id of the new row.
pub async fn record_metric_value<S>(
    store: &S,
    result: MaeResult,
    metric: &MetricRef,
    interval: &DatetimeInterval,
    site_id: Option<SiteId>,
    horizon_minutes: Option<i32>,
) -> StoreResult<DbId>
where
    S: MetricCatalogStore + LocationResolver + MetricValueWriter,
{
    let interval_ref = store
        .get_or_create_interval(interval.start(), interval.end())
        .await?;

    let location_id = match site_id {
        Some(site_id) => Some(store.resolve_location(site_id).await?.id),
        None => None,
    };

    store
        .insert_metric_value(NewMetricValue {
            value: result.value,
            sample_count: result.sample_count,
            metric_id: metric.id,
            interval_id: interval_ref.id,
            location_id,
            horizon_minutes,
        })
        .await
}
