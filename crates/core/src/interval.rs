//! The time window a metric run covers.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// A closed time window `[start, end]`.
///
/// Both bounds are inclusive for every accessor: a reading stamped exactly at
/// `start` or exactly at `end` belongs to the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatetimeInterval {
    start: Timestamp,
    end: Timestamp,
}

impl DatetimeInterval {
    /// Build an interval, rejecting empty or inverted windows.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::Validation(format!(
                "interval start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Whether `ts` falls inside the interval, bounds included.
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts <= self.end
    }
}
