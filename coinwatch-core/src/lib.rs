//! Coinwatch Core — streaming indicator and alerting engine.
//!
//! This crate contains the heart of the price-monitoring system:
//! - Domain types (OHLCV bars, price observations, alerts, configs)
//! - Bounded per-symbol history with FIFO eviction
//! - Series-level indicator math with exact and approximate backends
//! - Batch analysis pipeline (indicators → trend → signals → score)
//! - Z-score and streak anomaly detection
//! - The monitor engine: per-symbol alert state machine and listener
//!   dispatch with failure isolation
//!
//! Storage, transport, and process lifecycle live outside this crate; the
//! `BarProvider` and `Clock` traits are the seams they plug into.

pub mod analysis;
pub mod anomaly;
pub mod clock;
pub mod data;
pub mod domain;
pub mod error;
pub mod history;
pub mod indicators;
pub mod monitor;

mod stats;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything shared across threads is Send + Sync.
    ///
    /// The monitor engine is handed by reference to concurrent callers and
    /// its outputs cross thread boundaries; a regression here should break
    /// the build, not a deployment.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::OhlcvBar>();
        require_sync::<domain::OhlcvBar>();
        require_send::<domain::PriceObservation>();
        require_sync::<domain::PriceObservation>();
        require_send::<domain::Alert>();
        require_sync::<domain::Alert>();
        require_send::<domain::AlertConfig>();
        require_sync::<domain::AlertConfig>();

        // History
        require_send::<history::SymbolHistory>();
        require_sync::<history::SymbolHistory>();

        // Analysis types
        require_send::<analysis::Analyzer>();
        require_sync::<analysis::Analyzer>();
        require_send::<analysis::IndicatorSet>();
        require_sync::<analysis::IndicatorSet>();
        require_send::<analysis::AnalysisResult>();
        require_sync::<analysis::AnalysisResult>();
        require_send::<analysis::QuickAnalysis>();
        require_sync::<analysis::QuickAnalysis>();

        // Anomaly types
        require_send::<anomaly::AnomalyReport>();
        require_sync::<anomaly::AnomalyReport>();

        // Monitor engine and its outputs
        require_send::<monitor::MonitorEngine>();
        require_sync::<monitor::MonitorEngine>();
        require_send::<monitor::SymbolStats>();
        require_sync::<monitor::SymbolStats>();
        require_send::<monitor::AllStats>();
        require_sync::<monitor::AllStats>();
    }

    /// Architecture contract: batch analysis takes only the bar window.
    ///
    /// `analyze` sees no monitor state and no clock — the signature itself
    /// enforces that repeated calls over the same window are bit-identical.
    /// This test documents the contract and breaks loudly if the signature
    /// ever grows a state parameter.
    #[test]
    fn analysis_has_no_state_parameter() {
        fn _check_signature(
            analyzer: &analysis::Analyzer,
            bars: &[domain::OhlcvBar],
        ) -> Result<analysis::AnalysisResult, error::AnalysisError> {
            analyzer.analyze(bars)
        }
    }
}
