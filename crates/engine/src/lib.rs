//! Forecast accuracy metrics engine.
//!
//! Computes MAE partitions (per site, all sites, per horizon, per revision)
//! over a time window and appends each result as a metric value:
//!
//! - [`store`]: the async trait seams the engine reads and writes through.
//! - [`PgMetricsStore`] / [`InMemoryStore`]: Postgres and in-memory stores.
//! - [`views`]: time-windowed, horizon- and revision-aware reading sets.
//! - [`MetricCatalog`] and [`persistence`]: definition lookup and writes.
//! - [`MetricsEngine`]: one method per partition kind.
//! - [`run`]: drives every partition of a run and reports the outcome.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod persistence;
pub mod pg;
pub mod store;
pub mod views;

pub use catalog::MetricCatalog;
pub use engine::MetricsEngine;
pub use error::{EngineError, StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use orchestrator::{
    run, Partition, PartitionFailure, PartitionKind, PartitionOutcome, RunConfig, RunReport,
};
pub use pg::PgMetricsStore;
pub use store::MetricsStore;
