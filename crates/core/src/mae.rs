//! Mean absolute error over joined reading sets.
//!
//! Both sides are reduced to [`Reading`]s in MW before joining, so unit
//! conversion happens exactly once, at the edge (see
//! [`Observation::to_reading`](crate::observation::Observation::to_reading)).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{SiteId, Timestamp};

/// A value in MW for one site at one instant, ready to be joined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub site_id: SiteId,
    pub timestamp: Timestamp,
    pub value_mw: f64,
}

/// Outcome of one MAE computation.
///
/// `value` is `None` exactly when `sample_count` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaeResult {
    pub value: Option<f64>,
    pub sample_count: i64,
}

impl MaeResult {
    pub fn empty() -> Self {
        Self {
            value: None,
            sample_count: 0,
        }
    }

    pub fn has_data(&self) -> bool {
        self.sample_count > 0
    }
}

/// Whether a reading can take part in an aggregate.
///
/// NaN and infinities mark missing data upstream; they are skipped, never
/// treated as zero.
pub fn is_valid_value(value: f64) -> bool {
    value.is_finite()
}

/// Inner-join `actual` and `predicted` on (site, timestamp) and average the
/// absolute differences.
///
/// Timestamps must match exactly. Rows without a partner are dropped and not
/// counted. Duplicate keys pair up as in an SQL inner join. A pair is skipped
/// if either value is not a finite number.
pub fn mean_absolute_error(actual: &[Reading], predicted: &[Reading]) -> MaeResult {
    let mut by_key: HashMap<(SiteId, Timestamp), Vec<f64>> = HashMap::new();
    for p in predicted {
        by_key
            .entry((p.site_id, p.timestamp))
            .or_default()
            .push(p.value_mw);
    }

    let mut total = 0.0;
    let mut count: i64 = 0;

    for a in actual.iter().filter(|a| is_valid_value(a.value_mw)) {
        let Some(partners) = by_key.get(&(a.site_id, a.timestamp)) else {
            continue;
        };
        for &p in partners.iter().filter(|p| is_valid_value(**p)) {
            total += (a.value_mw - p).abs();
            count += 1;
        }
    }

    if count == 0 {
        return MaeResult::empty();
    }

    MaeResult {
        value: Some(total / count as f64),
        sample_count: count,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::forecast::ForecastValue;
    use crate::observation::{Observation, Regime};

    fn at(site_id: SiteId, hour: u32, value_mw: f64) -> Reading {
        Reading {
            site_id,
            timestamp: Utc.with_ymd_and_hms(2022, 1, 1, hour, 0, 0).unwrap(),
            value_mw,
        }
    }

    #[test]
    fn averages_absolute_differences() {
        let actual = vec![at(1, 0, 1.0), at(1, 1, 1.0)];
        let predicted = vec![at(1, 0, 1.0), at(1, 1, 4.0)];
        let result = mean_absolute_error(&actual, &predicted);
        assert_eq!(result.value, Some(1.5));
        assert_eq!(result.sample_count, 2);
    }

    #[test]
    fn no_overlap_gives_empty_result() {
        let actual = vec![at(1, 0, 1.0)];
        let predicted = vec![at(1, 1, 1.0)];
        assert_eq!(mean_absolute_error(&actual, &predicted), MaeResult::empty());
    }

    #[test]
    fn empty_inputs_give_empty_result() {
        let result = mean_absolute_error(&[], &[]);
        assert_eq!(result.value, None);
        assert_eq!(result.sample_count, 0);
        assert!(!result.has_data());
    }

    #[test]
    fn join_requires_same_site() {
        let actual = vec![at(1, 0, 1.0)];
        let predicted = vec![at(2, 0, 3.0)];
        assert_eq!(mean_absolute_error(&actual, &predicted).sample_count, 0);
    }

    #[test]
    fn unmatched_rows_are_not_counted() {
        let actual = vec![at(1, 0, 1.0), at(1, 1, 2.0), at(1, 2, 3.0)];
        let predicted = vec![at(1, 1, 2.5)];
        let result = mean_absolute_error(&actual, &predicted);
        assert_eq!(result.sample_count, 1);
        assert_eq!(result.value, Some(0.5));
    }

    #[test]
    fn nan_actuals_are_skipped_not_zeroed() {
        let actual = vec![at(1, 0, f64::NAN), at(1, 1, 2.0)];
        let predicted = vec![at(1, 0, 100.0), at(1, 1, 3.0)];
        let result = mean_absolute_error(&actual, &predicted);
        assert_eq!(result.sample_count, 1);
        assert_eq!(result.value, Some(1.0));
    }

    #[test]
    fn infinite_values_are_skipped() {
        let actual = vec![at(1, 0, f64::INFINITY), at(1, 1, 2.0)];
        let predicted = vec![at(1, 0, 1.0), at(1, 1, f64::NEG_INFINITY)];
        assert_eq!(mean_absolute_error(&actual, &predicted), MaeResult::empty());
    }

    #[test]
    fn duplicate_keys_join_pairwise() {
        let actual = vec![at(1, 0, 1.0), at(1, 0, 3.0)];
        let predicted = vec![at(1, 0, 2.0)];
        let result = mean_absolute_error(&actual, &predicted);
        assert_eq!(result.sample_count, 2);
        assert_eq!(result.value, Some(1.0));
    }

    #[test]
    fn kw_truth_against_mw_forecast_has_no_error() {
        let ts = Utc.with_ymd_and_hms(2022, 1, 1, 0, 30, 0).unwrap();
        let truth = Observation {
            site_id: 5,
            timestamp: ts,
            value_kw: 1000.0,
            regime: Regime::DayAfter,
        };
        let forecast = ForecastValue {
            site_id: 5,
            target_time: ts,
            created_time: ts,
            value_mw: 1.0,
        };
        let result = mean_absolute_error(&[truth.to_reading()], &[forecast.to_reading()]);
        assert_eq!(result.value, Some(0.0));
        assert_eq!(result.sample_count, 1);
    }

    #[test]
    fn validity_predicate() {
        assert!(is_valid_value(0.0));
        assert!(is_valid_value(-12.5));
        assert!(!is_valid_value(f64::NAN));
        assert!(!is_valid_value(f64::INFINITY));
    }
}
