//! Repository for the `forecast_values` and `forecast_values_latest` tables.

use pvmetrics_core::types::{SiteId, Timestamp};
use sqlx::PgExecutor;

use crate::models::forecast_value::{
    CreateForecastValue, ForecastValueLatest, ForecastValueRow, UpsertForecastValueLatest,
};

/// Column list for `forecast_values` queries, aliased `f`, joined with
/// `locations l`.
const HISTORY_COLUMNS: &str = "\
    f.id, f.location_id, l.gsp_id, f.target_time, f.created_utc, \
    f.expected_power_generation_megawatts";

/// Column list for `forecast_values_latest` queries.
const LATEST_COLUMNS: &str = "\
    id, gsp_id, target_time, created_utc, expected_power_generation_megawatts";

/// Provides read/write operations for the forecast history.
pub struct ForecastValueRepo;

impl ForecastValueRepo {
    /// Insert one historical forecast value.
    pub async fn insert<'e, E>(
        executor: E,
        input: &CreateForecastValue,
    ) -> Result<ForecastValueRow, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "WITH f AS ( \
                 INSERT INTO forecast_values \
                     (location_id, target_time, created_utc, expected_power_generation_megawatts) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, location_id, target_time, created_utc, \
                           expected_power_generation_megawatts \
             ) \
             SELECT {HISTORY_COLUMNS} FROM f INNER JOIN locations l ON l.id = f.location_id"
        );
        sqlx::query_as::<_, ForecastValueRow>(&query)
            .bind(input.location_id)
            .bind(input.target_time)
            .bind(input.created_utc)
            .bind(input.expected_power_generation_megawatts)
            .fetch_one(executor)
            .await
    }

    /// List forecast values whose `target_time` is in `[start, end]`,
    /// optionally restricted to one GSP.
    ///
    /// Ordered by GSP, target time, creation time, then id.
    pub async fn list_in_interval<'e, E>(
        executor: E,
        gsp_id: Option<SiteId>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<ForecastValueRow>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM forecast_values f \
             INNER JOIN locations l ON l.id = f.location_id \
             WHERE f.target_time >= $1 AND f.target_time <= $2 \
               AND ($3::INTEGER IS NULL OR l.gsp_id = $3) \
             ORDER BY l.gsp_id, f.target_time, f.created_utc, f.id"
        );
        sqlx::query_as::<_, ForecastValueRow>(&query)
            .bind(start)
            .bind(end)
            .bind(gsp_id)
            .fetch_all(executor)
            .await
    }
}

/// Provides read/write operations for the latest-forecast table.
pub struct ForecastValueLatestRepo;

impl ForecastValueLatestRepo {
    /// Insert or replace the latest forecast for a GSP and target time.
    ///
    /// A stored row is only replaced by one created at the same time or
    /// later. Returns `None` when the stored row is newer and was kept.
    pub async fn upsert<'e, E>(
        executor: E,
        input: &UpsertForecastValueLatest,
    ) -> Result<Option<ForecastValueLatest>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO forecast_values_latest \
                 (gsp_id, target_time, created_utc, expected_power_generation_megawatts) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (gsp_id, target_time) DO UPDATE SET \
                 created_utc = EXCLUDED.created_utc, \
                 expected_power_generation_megawatts = EXCLUDED.expected_power_generation_megawatts \
             WHERE forecast_values_latest.created_utc <= EXCLUDED.created_utc \
             RETURNING {LATEST_COLUMNS}"
        );
        sqlx::query_as::<_, ForecastValueLatest>(&query)
            .bind(input.gsp_id)
            .bind(input.target_time)
            .bind(input.created_utc)
            .bind(input.expected_power_generation_megawatts)
            .fetch_optional(executor)
            .await
    }

    /// List latest forecasts whose `target_time` is in `[start, end]`,
    /// optionally restricted to one GSP.
    pub async fn list_in_interval<'e, E>(
        executor: E,
        gsp_id: Option<SiteId>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<ForecastValueLatest>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {LATEST_COLUMNS} FROM forecast_values_latest \
             WHERE target_time >= $1 AND target_time <= $2 \
               AND ($3::INTEGER IS NULL OR gsp_id = $3) \
             ORDER BY gsp_id, target_time"
        );
        sqlx::query_as::<_, ForecastValueLatest>(&query)
            .bind(start)
            .bind(end)
            .bind(gsp_id)
            .fetch_all(executor)
            .await
    }
}
