//! Batch analysis over an externally supplied OHLCV window.
//!
//! Pure functions of their input: no hidden state, identical input bars
//! produce identical output. The pipeline is indicator extraction
//! (`set`), trend/signal classification (`trend`), composite scoring
//! (`score`), and the `Analyzer` entry points (`engine`).

pub mod engine;
pub mod score;
pub mod set;
pub mod trend;

pub use engine::{
    AnalysisResult, Analyzer, QuickAnalysis, QuickTrend, SupportResistance,
    FULL_ANALYSIS_MIN_BARS, QUICK_ANALYSIS_MIN_BARS,
};
pub use score::{overall_score, OverallScore, ScoreVerdict};
pub use set::{
    AdxSummary, AtrSummary, BandPosition, BollingerSummary, ComputeBackend, IndicatorSet,
    MacdSignal, MacdSummary, RsiSignal, StochasticSignal, StochasticSummary, TrendStrength,
    VolatilityLevel,
};
pub use trend::{
    classify_trend, trade_signals, RsiTradeSignal, TradeSignals, TrendAnalysis, TrendDirection,
    TrendSignal,
};
