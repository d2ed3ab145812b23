//! A single recorded price point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One price observation for a monitored symbol.
///
/// Immutable once recorded; owned by the history slot it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl PriceObservation {
    pub fn new(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self { price, timestamp }
    }
}
