/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Site (GSP) identifier as stored in `locations.gsp_id`.
pub type SiteId = i32;

/// Site id reserved for the national aggregate.
pub const NATIONAL_SITE_ID: SiteId = 0;

/// Ground truth is stored in kW, forecasts in MW.
pub const KW_PER_MW: f64 = 1000.0;
