//! Metric definitions recorded alongside every computed value.

use serde::{Deserialize, Serialize};

/// Name of the per-site MAE of the latest forecast against settled truth.
/// Horizon-bucketed values reuse this definition.
pub const METRIC_LATEST_MAE: &str = "Daily Latest MAE";

/// Name of the latest-forecast MAE across all non-national sites.
pub const METRIC_LATEST_MAE_ALL_SITES: &str = "Daily Latest MAE All GSPs";

/// Name of the MAE between the in-day and day-after ground-truth estimates.
pub const METRIC_REVISION_MAE: &str = "PVLive MAE";

/// A named metric. Identity is by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub name: String,
    pub description: String,
}

impl MetricDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The fixed set of definitions a metric run writes against.
///
/// Passed into the catalog at construction; nothing reads it from global
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinitions {
    pub latest: MetricDefinition,
    pub latest_all_sites: MetricDefinition,
    pub revision: MetricDefinition,
}

impl MetricDefinitions {
    pub fn standard() -> Self {
        Self {
            latest: MetricDefinition::new(
                METRIC_LATEST_MAE,
                "This metric calculates the MAE for the latest forecast and compares \
                 with the settled ground truth values. The data is from one day.",
            ),
            latest_all_sites: MetricDefinition::new(
                METRIC_LATEST_MAE_ALL_SITES,
                "This metric calculates the MAE for the latest forecast and compares \
                 with the settled ground truth values. The data is from one day. \
                 This is for all GSPs (not the national).",
            ),
            revision: MetricDefinition::new(
                METRIC_REVISION_MAE,
                "This metric calculates the MAE between the initial in-day ground truth \
                 estimate and the updated day-after estimate. The data is from one day \
                 for each GSP.",
            ),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        [&self.latest, &self.latest_all_sites, &self.revision].into_iter()
    }
}

impl Default for MetricDefinitions {
    fn default() -> Self {
        Self::standard()
    }
}
