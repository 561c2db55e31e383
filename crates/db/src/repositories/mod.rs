//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! any Postgres executor (`&PgPool`, `&mut PgConnection`, a transaction) as
//! the first argument. Every method is a single statement.

pub mod datetime_interval_repo;
pub mod forecast_value_repo;
pub mod gsp_yield_repo;
pub mod location_repo;
pub mod metric_repo;
pub mod metric_value_repo;

pub use datetime_interval_repo::DatetimeIntervalRepo;
pub use forecast_value_repo::{ForecastValueLatestRepo, ForecastValueRepo};
pub use gsp_yield_repo::GspYieldRepo;
pub use location_repo::LocationRepo;
pub use metric_repo::MetricRepo;
pub use metric_value_repo::MetricValueRepo;
