//! Live monitoring: per-symbol price ingestion, alert evaluation, and
//! listener dispatch.

pub mod engine;
pub mod listener;

pub use engine::{
    AllStats, DisabledAlertScope, MonitorEngine, MonitorError, SymbolStats, TREND_CHECK_MIN_POINTS,
    VOLATILITY_CHECK_MIN_POINTS,
};
pub use listener::{
    AlertListener, CollectingListener, ListenerError, LogListener, MAX_CONSECUTIVE_FAILURES,
};
