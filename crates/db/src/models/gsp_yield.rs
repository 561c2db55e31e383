//! Ground-truth yield models and DTOs.

use pvmetrics_core::types::{DbId, SiteId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A ground-truth reading joined with its location's GSP id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GspYield {
    pub id: DbId,
    pub location_id: DbId,
    pub gsp_id: SiteId,
    pub datetime_utc: Timestamp,
    pub solar_generation_kw: f64,
    pub regime: String,
}

/// DTO for inserting a ground-truth reading.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGspYield {
    pub location_id: DbId,
    pub datetime_utc: Timestamp,
    pub solar_generation_kw: f64,
    pub regime: String,
}
