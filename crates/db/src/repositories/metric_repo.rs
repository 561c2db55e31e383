//! Repository for the `metrics` catalog table.

use sqlx::PgExecutor;

use crate::models::metric::Metric;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at";

/// Provides catalog operations for metric definitions.
pub struct MetricRepo;

impl MetricRepo {
    /// Return the metric named `name`, creating it on first use.
    ///
    /// The stored description is left untouched when the metric exists.
    pub async fn get_or_create<'e, E>(
        executor: E,
        name: &str,
        description: &str,
    ) -> Result<Metric, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO metrics (name, description) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Metric>(&query)
            .bind(name)
            .bind(description)
            .fetch_one(executor)
            .await
    }

    /// Find a metric by its unique name.
    pub async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Metric>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM metrics WHERE name = $1");
        sqlx::query_as::<_, Metric>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// List all metrics ordered by name.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Metric>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM metrics ORDER BY name");
        sqlx::query_as::<_, Metric>(&query).fetch_all(executor).await
    }
}
