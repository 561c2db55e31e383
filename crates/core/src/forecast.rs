//! Forecast values, horizons and the selection rules over them.
//!
//! Two selections are defined here:
//!
//! - [`select_horizon_bucket`]: per target time, the forecast made a given
//!   lead time ahead.
//! - [`latest_per_target`]: per target time, the most recently created
//!   forecast.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::interval::DatetimeInterval;
use crate::mae::Reading;
use crate::types::{SiteId, Timestamp};

/// Default horizon bucket width, matching the orchestrator's horizon step.
pub const DEFAULT_HORIZON_STEP_MINUTES: i64 = 30;

// ---------------------------------------------------------------------------
// ForecastValue
// ---------------------------------------------------------------------------

/// A single predicted value for one site and target time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastValue {
    pub site_id: SiteId,
    pub target_time: Timestamp,
    pub created_time: Timestamp,
    /// Expected generation in MW.
    pub value_mw: f64,
}

impl ForecastValue {
    /// Lead time between creation and target. Negative if the forecast was
    /// created after its target time.
    pub fn horizon(&self) -> Duration {
        self.target_time - self.created_time
    }

    pub fn to_reading(&self) -> Reading {
        Reading {
            site_id: self.site_id,
            timestamp: self.target_time,
            value_mw: self.value_mw,
        }
    }
}

/// Keep forecasts whose target time is in `interval`, for `site_id` (any site
/// if `None`).
pub fn filter_forecasts<'a>(
    rows: impl IntoIterator<Item = &'a ForecastValue>,
    interval: &DatetimeInterval,
    site_id: Option<SiteId>,
) -> Vec<ForecastValue> {
    rows.into_iter()
        .filter(|f| site_id.map_or(true, |id| f.site_id == id))
        .filter(|f| interval.contains(f.target_time))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// HorizonBucket
// ---------------------------------------------------------------------------

/// Half-open horizon window `[start_minutes, start_minutes + width_minutes)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonBucket {
    start_minutes: i64,
    width_minutes: i64,
}

impl HorizonBucket {
    pub fn new(start_minutes: i64, width_minutes: i64) -> Result<Self, CoreError> {
        if start_minutes < 0 {
            return Err(CoreError::Validation(format!(
                "forecast horizon must be >= 0 minutes, got {start_minutes}"
            )));
        }
        if width_minutes <= 0 {
            return Err(CoreError::Validation(format!(
                "horizon bucket width must be > 0 minutes, got {width_minutes}"
            )));
        }
        Ok(Self {
            start_minutes,
            width_minutes,
        })
    }

    pub fn start_minutes(&self) -> i64 {
        self.start_minutes
    }

    pub fn width_minutes(&self) -> i64 {
        self.width_minutes
    }

    pub fn contains(&self, horizon: Duration) -> bool {
        let lower = Duration::minutes(self.start_minutes);
        let upper = Duration::minutes(self.start_minutes + self.width_minutes);
        lower <= horizon && horizon < upper
    }
}

/// For each (site, target time), pick the forecast whose horizon lies in
/// `bucket`.
///
/// When several forecasts fall into the bucket the one with the smallest
/// horizon wins, i.e. the one closest to the requested lead time. Equal
/// horizons keep whichever row came first. Output is ordered by site then
/// target time.
pub fn select_horizon_bucket<'a>(
    rows: impl IntoIterator<Item = &'a ForecastValue>,
    bucket: HorizonBucket,
) -> Vec<ForecastValue> {
    let mut chosen: BTreeMap<(SiteId, Timestamp), &ForecastValue> = BTreeMap::new();

    for row in rows {
        let horizon = row.horizon();
        if !bucket.contains(horizon) {
            continue;
        }
        chosen
            .entry((row.site_id, row.target_time))
            .and_modify(|current| {
                if horizon < current.horizon() {
                    *current = row;
                }
            })
            .or_insert(row);
    }

    chosen.into_values().cloned().collect()
}

/// For each (site, target time), keep only the most recently created forecast.
///
/// Ties on `created_time` go to the later row, matching an upsert where the
/// last write wins. Output is ordered by site then target time.
pub fn latest_per_target<'a>(rows: impl IntoIterator<Item = &'a ForecastValue>) -> Vec<ForecastValue> {
    let mut latest: BTreeMap<(SiteId, Timestamp), &ForecastValue> = BTreeMap::new();

    for row in rows {
        latest
            .entry((row.site_id, row.target_time))
            .and_modify(|current| {
                if row.created_time >= current.created_time {
                    *current = row;
                }
            })
            .or_insert(row);
    }

    latest.into_values().cloned().collect()
}
