//! Repository for the `metric_values` table (append-only history).

use pvmetrics_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::metric::{CreateMetricValue, MetricValue};

/// Column list for `metric_values` SELECT queries.
const COLUMNS: &str = "\
    id, value, number_of_data_points, metric_id, datetime_interval_id, \
    location_id, forecast_horizon_minutes, created_at";

/// Provides append and read operations for metric values. Rows are never
/// updated or deleted.
pub struct MetricValueRepo;

impl MetricValueRepo {
    /// Append one metric value.
    pub async fn insert<'e, E>(
        executor: E,
        input: &CreateMetricValue,
    ) -> Result<MetricValue, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO metric_values \
                 (value, number_of_data_points, metric_id, datetime_interval_id, \
                  location_id, forecast_horizon_minutes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MetricValue>(&query)
            .bind(input.value)
            .bind(input.number_of_data_points)
            .bind(input.metric_id)
            .bind(input.datetime_interval_id)
            .bind(input.location_id)
            .bind(input.forecast_horizon_minutes)
            .fetch_one(executor)
            .await
    }

    /// List the history of one metric, oldest first.
    pub async fn list_for_metric<'e, E>(
        executor: E,
        metric_id: DbId,
    ) -> Result<Vec<MetricValue>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM metric_values \
             WHERE metric_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, MetricValue>(&query)
            .bind(metric_id)
            .fetch_all(executor)
            .await
    }
}
