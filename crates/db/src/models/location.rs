//! Location entity model.

use pvmetrics_core::types::{DbId, SiteId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A forecast location, keyed externally by its GSP id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub gsp_id: SiteId,
    pub label: Option<String>,
    pub created_at: Timestamp,
}
