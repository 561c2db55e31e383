//! Forecast value models and DTOs.
//!
//! `forecast_values` keeps every forecast ever made; `forecast_values_latest`
//! keeps one row per GSP and target time.

use pvmetrics_core::types::{DbId, SiteId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Forecast history
// ---------------------------------------------------------------------------

/// A historical forecast value joined with its location's GSP id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ForecastValueRow {
    pub id: DbId,
    pub location_id: DbId,
    pub gsp_id: SiteId,
    pub target_time: Timestamp,
    pub created_utc: Timestamp,
    pub expected_power_generation_megawatts: f64,
}

/// DTO for inserting a historical forecast value.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateForecastValue {
    pub location_id: DbId,
    pub target_time: Timestamp,
    pub created_utc: Timestamp,
    pub expected_power_generation_megawatts: f64,
}

// ---------------------------------------------------------------------------
// Latest forecast
// ---------------------------------------------------------------------------

/// The most recent forecast for one GSP and target time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ForecastValueLatest {
    pub id: DbId,
    pub gsp_id: SiteId,
    pub target_time: Timestamp,
    pub created_utc: Timestamp,
    pub expected_power_generation_megawatts: f64,
}

/// DTO for upserting a latest forecast value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertForecastValueLatest {
    pub gsp_id: SiteId,
    pub target_time: Timestamp,
    pub created_utc: Timestamp,
    pub expected_power_generation_megawatts: f64,
}
