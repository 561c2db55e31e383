//! Repository for the `locations` table.

use pvmetrics_core::types::SiteId;
use sqlx::PgExecutor;

use crate::models::location::Location;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, gsp_id, label, created_at";

/// Provides lookup operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Return the location for `gsp_id`, creating it on first use.
    ///
    /// Uses `ON CONFLICT` so concurrent first lookups resolve to one row.
    pub async fn get_or_create<'e, E>(executor: E, gsp_id: SiteId) -> Result<Location, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO locations (gsp_id) VALUES ($1) \
             ON CONFLICT (gsp_id) DO UPDATE SET gsp_id = EXCLUDED.gsp_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(gsp_id)
            .fetch_one(executor)
            .await
    }

    /// Find a location by its GSP id.
    pub async fn find_by_gsp_id<'e, E>(
        executor: E,
        gsp_id: SiteId,
    ) -> Result<Option<Location>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE gsp_id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(gsp_id)
            .fetch_optional(executor)
            .await
    }
}
