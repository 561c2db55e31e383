//! Ground-truth readings and their revision regimes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::interval::DatetimeInterval;
use crate::mae::Reading;
use crate::types::{SiteId, Timestamp, KW_PER_MW};

// ---------------------------------------------------------------------------
// Regime
// ---------------------------------------------------------------------------

/// Which estimate of a ground-truth reading a row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Regime {
    /// Early estimate published during the day.
    InDay,
    /// Settled estimate published the day after. The canonical truth.
    DayAfter,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::InDay => "in-day",
            Regime::DayAfter => "day-after",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Regime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-day" => Ok(Regime::InDay),
            "day-after" => Ok(Regime::DayAfter),
            other => Err(CoreError::UnknownRegime(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// One ground-truth reading for one site, time and regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub site_id: SiteId,
    pub timestamp: Timestamp,
    /// Generation in kW.
    pub value_kw: f64,
    pub regime: Regime,
}

impl Observation {
    /// Convert to an aggregator reading in MW.
    pub fn to_reading(&self) -> Reading {
        Reading {
            site_id: self.site_id,
            timestamp: self.timestamp,
            value_mw: self.value_kw / KW_PER_MW,
        }
    }
}

/// Keep observations in `interval` for `site_id` (any site if `None`) and
/// `regime`.
///
/// Stores apply the same filter when they query; this is the in-process
/// equivalent used by the in-memory store and as a guard on fetched rows.
pub fn filter_observations<'a>(
    rows: impl IntoIterator<Item = &'a Observation>,
    interval: &DatetimeInterval,
    site_id: Option<SiteId>,
    regime: Regime,
) -> Vec<Observation> {
    rows.into_iter()
        .filter(|o| o.regime == regime)
        .filter(|o| site_id.map_or(true, |id| o.site_id == id))
        .filter(|o| interval.contains(o.timestamp))
        .cloned()
        .collect()
}
