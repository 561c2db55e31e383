//! Metric catalog, interval and metric value models (append-only values).

use pvmetrics_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// A named metric definition.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Metric {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// DatetimeInterval
// ---------------------------------------------------------------------------

/// A stored time window; unique on its bounds.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DatetimeIntervalRow {
    pub id: DbId,
    pub start_datetime_utc: Timestamp,
    pub end_datetime_utc: Timestamp,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// MetricValue
// ---------------------------------------------------------------------------

/// One computed metric value.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MetricValue {
    pub id: DbId,
    pub value: Option<f64>,
    pub number_of_data_points: i64,
    pub metric_id: DbId,
    pub datetime_interval_id: DbId,
    pub location_id: Option<DbId>,
    pub forecast_horizon_minutes: Option<i32>,
    pub created_at: Timestamp,
}

/// DTO for inserting a metric value.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMetricValue {
    pub value: Option<f64>,
    pub number_of_data_points: i64,
    pub metric_id: DbId,
    pub datetime_interval_id: DbId,
    pub location_id: Option<DbId>,
    pub forecast_horizon_minutes: Option<i32>,
}
