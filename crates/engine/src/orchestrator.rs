//! Drives every partition of a metric run.
//!
//! A run walks four partition kinds in a fixed order: latest MAE per site,
//! latest MAE across all sites, national horizon MAE per horizon and
//! revision MAE per site. Each partition is computed and recorded on its own.
//! A failing partition is logged and reported but never stops the others.

use pvmetrics_core::forecast::DEFAULT_HORIZON_STEP_MINUTES;
use pvmetrics_core::interval::DatetimeInterval;
use pvmetrics_core::mae::MaeResult;
use pvmetrics_core::types::{SiteId, Timestamp, NATIONAL_SITE_ID};
use serde::Serialize;

use crate::catalog::MetricCatalog;
use crate::engine::MetricsEngine;
use crate::error::{EngineError, StoreResult};
use crate::store::MetricsStore;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Parameters of one metric run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub interval: DatetimeInterval,
    /// Sites `0..=max_site_id` are processed.
    pub max_site_id: SiteId,
    /// Horizons `0, step, 2 * step, ...` below this value are processed.
    pub max_horizon_minutes: i32,
    pub horizon_step_minutes: i32,
}

impl RunConfig {
    /// Build a config from raw bounds, rejecting `start >= end`.
    pub fn from_bounds(
        start: Timestamp,
        end: Timestamp,
        max_site_id: SiteId,
        max_horizon_minutes: i32,
    ) -> Result<Self, EngineError> {
        let config = Self {
            interval: DatetimeInterval::new(start, end)?,
            max_site_id,
            max_horizon_minutes,
            horizon_step_minutes: DEFAULT_HORIZON_STEP_MINUTES as i32,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_horizon_step(mut self, horizon_step_minutes: i32) -> Self {
        self.horizon_step_minutes = horizon_step_minutes;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_site_id < 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "max site id must be >= 0, got {}",
                self.max_site_id
            )));
        }
        if self.max_horizon_minutes < 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "max forecast horizon must be >= 0 minutes, got {}",
                self.max_horizon_minutes
            )));
        }
        if self.horizon_step_minutes <= 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "horizon step must be > 0 minutes, got {}",
                self.horizon_step_minutes
            )));
        }
        Ok(())
    }

    /// Every partition of the run, in processing order.
    pub fn partitions(&self) -> Vec<Partition> {
        let sites = 0..=self.max_site_id;
        let horizons = (0..self.max_horizon_minutes).step_by(self.horizon_step_minutes.max(1) as usize);

        sites
            .clone()
            .map(Partition::LatestForSite)
            .chain(std::iter::once(Partition::LatestAllSites))
            .chain(horizons.map(|horizon_minutes| Partition::Horizon {
                site_id: NATIONAL_SITE_ID,
                horizon_minutes,
            }))
            .chain(sites.map(Partition::Revision))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Partitions and report
// ---------------------------------------------------------------------------

/// Which computation a partition runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionKind {
    LatestForSite,
    LatestAllSites,
    Horizon,
    Revision,
}

/// One unit of work in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    LatestForSite(SiteId),
    LatestAllSites,
    Horizon {
        site_id: SiteId,
        horizon_minutes: i32,
    },
    Revision(SiteId),
}

impl Partition {
    pub fn kind(&self) -> PartitionKind {
        match self {
            Partition::LatestForSite(_) => PartitionKind::LatestForSite,
            Partition::LatestAllSites => PartitionKind::LatestAllSites,
            Partition::Horizon { .. } => PartitionKind::Horizon,
            Partition::Revision(_) => PartitionKind::Revision,
        }
    }

    /// The site the partition reads, if it is scoped to one.
    pub fn site_id(&self) -> Option<SiteId> {
        match *self {
            Partition::LatestForSite(site_id)
            | Partition::Revision(site_id)
            | Partition::Horizon { site_id, .. } => Some(site_id),
            Partition::LatestAllSites => None,
        }
    }

    pub fn horizon_minutes(&self) -> Option<i32> {
        match *self {
            Partition::Horizon {
                horizon_minutes, ..
            } => Some(horizon_minutes),
            _ => None,
        }
    }
}

/// A partition that was computed and recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionOutcome {
    pub partition: Partition,
    pub result: MaeResult,
}

/// A partition that failed, with the error rendered as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionFailure {
    pub partition: Partition,
    pub error: String,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub recorded: Vec<PartitionOutcome>,
    pub failures: Vec<PartitionFailure>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn recorded_of(&self, kind: PartitionKind) -> impl Iterator<Item = &PartitionOutcome> {
        self.recorded
            .iter()
            .filter(move |o| o.partition.kind() == kind)
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Compute and record every partition of `config`.
///
/// The config is validated before any store call. Partition failures are
/// collected in the report; the returned error is reserved for a config that
/// cannot be run at all.
pub async fn run<S: MetricsStore>(
    store: &S,
    catalog: &MetricCatalog,
    config: &RunConfig,
) -> Result<RunReport, EngineError> {
    config.validate()?;

    let partitions = config.partitions();
    tracing::info!(
        start = %config.interval.start(),
        end = %config.interval.end(),
        max_site_id = config.max_site_id,
        max_horizon_minutes = config.max_horizon_minutes,
        horizon_step_minutes = config.horizon_step_minutes,
        partitions = partitions.len(),
        "Starting metric run"
    );

    let engine = MetricsEngine::new(store, catalog);
    let mut report = RunReport::default();

    for partition in partitions {
        match run_partition(&engine, config, partition).await {
            Ok(result) => report.recorded.push(PartitionOutcome { partition, result }),
            Err(e) => {
                tracing::error!(
                    partition = ?partition,
                    error = %e,
                    "Metric partition failed"
                );
                report.failures.push(PartitionFailure {
                    partition,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        recorded = report.recorded.len(),
        failed = report.failures.len(),
        "Metric run finished"
    );

    Ok(report)
}

async fn run_partition<S: MetricsStore>(
    engine: &MetricsEngine<'_, S>,
    config: &RunConfig,
    partition: Partition,
) -> StoreResult<MaeResult> {
    let interval = &config.interval;
    match partition {
        Partition::LatestForSite(site_id) => engine.latest_mae_for_site(interval, site_id).await,
        Partition::LatestAllSites => engine.latest_mae_all_sites(interval).await,
        Partition::Horizon {
            site_id,
            horizon_minutes,
        } => {
            engine
                .horizon_mae(interval, site_id, horizon_minutes, config.horizon_step_minutes)
                .await
        }
        Partition::Revision(site_id) => engine.revision_mae(interval, site_id).await,
    }
}
