//! Repository for the `gsp_yields` table (ground-truth readings).

use pvmetrics_core::types::{SiteId, Timestamp};
use sqlx::PgExecutor;

use crate::models::gsp_yield::{CreateGspYield, GspYield};

/// Column list for `gsp_yields` SELECT queries, aliased `y`, joined with
/// `locations l` for the GSP id.
const COLUMNS: &str = "\
    y.id, y.location_id, l.gsp_id, y.datetime_utc, y.solar_generation_kw, y.regime";

/// Provides read/write operations for ground-truth readings.
pub struct GspYieldRepo;

impl GspYieldRepo {
    /// Insert one reading.
    pub async fn insert<'e, E>(executor: E, input: &CreateGspYield) -> Result<GspYield, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "WITH y AS ( \
                 INSERT INTO gsp_yields (location_id, datetime_utc, solar_generation_kw, regime) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, location_id, datetime_utc, solar_generation_kw, regime \
             ) \
             SELECT {COLUMNS} FROM y INNER JOIN locations l ON l.id = y.location_id"
        );
        sqlx::query_as::<_, GspYield>(&query)
            .bind(input.location_id)
            .bind(input.datetime_utc)
            .bind(input.solar_generation_kw)
            .bind(&input.regime)
            .fetch_one(executor)
            .await
    }

    /// List readings with `datetime_utc` in `[start, end]` for one regime,
    /// optionally restricted to one GSP.
    ///
    /// Ordered by GSP, time, then id so callers see a stable order.
    pub async fn list_in_interval<'e, E>(
        executor: E,
        gsp_id: Option<SiteId>,
        start: Timestamp,
        end: Timestamp,
        regime: &str,
    ) -> Result<Vec<GspYield>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM gsp_yields y \
             INNER JOIN locations l ON l.id = y.location_id \
             WHERE y.datetime_utc >= $1 AND y.datetime_utc <= $2 \
               AND y.regime = $3 \
               AND ($4::INTEGER IS NULL OR l.gsp_id = $4) \
             ORDER BY l.gsp_id, y.datetime_utc, y.id"
        );
        sqlx::query_as::<_, GspYield>(&query)
            .bind(start)
            .bind(end)
            .bind(regime)
            .bind(gsp_id)
            .fetch_all(executor)
            .await
    }
}
