//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and, where rows are written, a create DTO.

pub mod forecast_value;
pub mod gsp_yield;
pub mod location;
pub mod metric;
