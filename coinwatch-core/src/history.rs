//! Bounded per-symbol price history.
//!
//! Fixed-capacity FIFO: insertion appends, overflow evicts the oldest
//! entry. Insertion order is load-bearing — oldest first, newest last.

use crate::domain::PriceObservation;
use serde::Serialize;
use std::collections::VecDeque;

/// Observations retained per symbol.
pub const HISTORY_CAPACITY: usize = 100;

/// Sliding window of price observations for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolHistory {
    observations: VecDeque<PriceObservation>,
    capacity: usize,
}

impl Default for SymbolHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 1, "history capacity must be >= 1");
        Self {
            observations: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an observation, evicting the oldest when full.
    pub fn push(&mut self, observation: PriceObservation) {
        if self.observations.len() == self.capacity {
            self.observations.pop_front();
        }
        self.observations.push_back(observation);
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Oldest-first iteration over the retained observations.
    pub fn iter(&self) -> impl Iterator<Item = &PriceObservation> {
        self.observations.iter()
    }

    /// The price series, oldest first.
    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.price).collect()
    }

    pub fn last(&self) -> Option<&PriceObservation> {
        self.observations.back()
    }

    pub fn clear(&mut self) {
        self.observations.clear();
    }
}
