//! Structured error type for batch analysis operations.
//!
//! Insufficient input is a structured result, never a panic — callers
//! (the API layer, the monitor) render "not enough data yet" from it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("insufficient data: have {have} bars, need {need}")]
    InsufficientData { have: usize, need: usize },
}

impl AnalysisError {
    /// Guard helper: `Err(InsufficientData)` unless `have >= need`.
    pub fn require(have: usize, need: usize) -> Result<(), AnalysisError> {
        if have < need {
            Err(AnalysisError::InsufficientData { have, need })
        } else {
            Ok(())
        }
    }
}
