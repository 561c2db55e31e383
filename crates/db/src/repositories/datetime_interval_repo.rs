//! Repository for the `datetime_intervals` table.

use pvmetrics_core::types::Timestamp;
use sqlx::PgExecutor;

use crate::models::metric::DatetimeIntervalRow;

const COLUMNS: &str = "id, start_datetime_utc, end_datetime_utc, created_at";

/// Provides lookup operations for metric time windows.
pub struct DatetimeIntervalRepo;

impl DatetimeIntervalRepo {
    /// Return the interval with exactly these bounds, creating it on first use.
    pub async fn get_or_create<'e, E>(
        executor: E,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<DatetimeIntervalRow, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO datetime_intervals (start_datetime_utc, end_datetime_utc) \
             VALUES ($1, $2) \
             ON CONFLICT (start_datetime_utc, end_datetime_utc) \
                 DO UPDATE SET start_datetime_utc = EXCLUDED.start_datetime_utc \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DatetimeIntervalRow>(&query)
            .bind(start)
            .bind(end)
            .fetch_one(executor)
            .await
    }
}
