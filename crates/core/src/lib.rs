//! Domain types and pure logic for forecast accuracy metrics.
//!
//! Nothing in this crate touches the database. The engine crate feeds it
//! rows fetched through the store traits and persists what comes out.

pub mod error;
pub mod forecast;
pub mod interval;
pub mod mae;
pub mod metric;
pub mod observation;
pub mod types;
