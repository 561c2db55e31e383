use anyhow::{anyhow, Context};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use pvmetrics_core::forecast::DEFAULT_HORIZON_STEP_MINUTES;
use pvmetrics_core::types::{SiteId, Timestamp};
use pvmetrics_db::DEFAULT_MAX_CONNECTIONS;
use pvmetrics_engine::RunConfig;

/// Highest GSP id processed by default.
pub const DEFAULT_MAX_SITE_ID: SiteId = 317;

/// Horizons below this many minutes are processed by default.
pub const DEFAULT_MAX_HORIZON_MINUTES: i32 = 480;

/// Worker configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub start: Timestamp,
    pub end: Timestamp,
    pub max_site_id: SiteId,
    pub max_horizon_minutes: i32,
    pub horizon_step_minutes: i32,
}

impl WorkerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                    |
    /// |--------------------------------|----------------------------|
    /// | `DATABASE_URL`                 | required                   |
    /// | `DATABASE_MAX_CONNECTIONS`     | `5`                        |
    /// | `METRICS_START`                | start of the previous UTC day |
    /// | `METRICS_END`                  | end of the previous UTC day   |
    /// | `METRICS_MAX_SITE_ID`          | `317`                      |
    /// | `METRICS_MAX_HORIZON_MINUTES`  | `480`                      |
    /// | `METRICS_HORIZON_STEP_MINUTES` | `30`                       |
    ///
    /// When only one of `METRICS_START` / `METRICS_END` is set, the other
    /// is placed one day away from it.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), Utc::now())
    }

    /// Load configuration through `lookup`, with `now` deciding the default
    /// window.
    pub fn from_lookup<F>(lookup: F, now: Timestamp) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let max_site_id = parse_or(&lookup, "METRICS_MAX_SITE_ID", DEFAULT_MAX_SITE_ID)?;
        let max_horizon_minutes =
            parse_or(&lookup, "METRICS_MAX_HORIZON_MINUTES", DEFAULT_MAX_HORIZON_MINUTES)?;
        let horizon_step_minutes = parse_or(
            &lookup,
            "METRICS_HORIZON_STEP_MINUTES",
            DEFAULT_HORIZON_STEP_MINUTES as i32,
        )?;

        let start = lookup("METRICS_START")
            .map(|v| parse_timestamp("METRICS_START", &v))
            .transpose()?;
        let end = lookup("METRICS_END")
            .map(|v| parse_timestamp("METRICS_END", &v))
            .transpose()?;

        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, start + Duration::days(1)),
            (None, Some(end)) => (end - Duration::days(1), end),
            (None, None) => previous_day(now),
        };

        Ok(Self {
            database_url,
            max_connections,
            start,
            end,
            max_site_id,
            max_horizon_minutes,
            horizon_step_minutes,
        })
    }

    /// The validated engine configuration for this run.
    pub fn run_config(&self) -> anyhow::Result<RunConfig> {
        let config = RunConfig::from_bounds(
            self.start,
            self.end,
            self.max_site_id,
            self.max_horizon_minutes,
        )?
        .with_horizon_step(self.horizon_step_minutes);
        config.validate()?;
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} must be a valid number, got {raw:?}: {e}")),
        None => Ok(default),
    }
}

fn parse_timestamp(key: &str, raw: &str) -> anyhow::Result<Timestamp> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .with_context(|| format!("{key} must be an RFC 3339 timestamp, got {raw:?}"))
}

/// `[yesterday 00:00, today 00:00]` in UTC.
fn previous_day(now: Timestamp) -> (Timestamp, Timestamp) {
    let midnight = Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN));
    (midnight - Duration::days(1), midnight)
}
