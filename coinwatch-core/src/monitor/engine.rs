//! The monitor engine: per-symbol alert state machine.
//!
//! An explicitly constructed, explicitly owned instance — monitored
//! symbols, histories, and configs are private fields, never process-wide
//! state. Updates for different symbols proceed in parallel; updates for
//! the same symbol serialize on that symbol's lock, so history mutation
//! and the threshold checks that follow observe a consistent snapshot.
//! Listeners are notified after the symbol lock is released.

use crate::anomaly::{self, AnomalyReport};
use crate::clock::{Clock, SystemClock};
use crate::domain::{
    Alert, AlertConfig, AlertKind, ConfigError, PriceObservation, Severity, Symbol,
    DEFAULT_VOLATILITY_THRESHOLD,
};
use crate::error::AnalysisError;
use crate::history::SymbolHistory;
use crate::stats::{mean, volatility_pct};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

use super::listener::{AlertListener, RegisteredListener, MAX_CONSECUTIVE_FAILURES};

/// History points required by the volatility check.
pub const VOLATILITY_CHECK_MIN_POINTS: usize = 10;
/// History points required by the trend-spike check.
pub const TREND_CHECK_MIN_POINTS: usize = 20;

const SPIKE_SHORT_WINDOW: usize = 5;
const SPIKE_THRESHOLD_PCT: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("no data available for symbol '{symbol}'")]
    NoData { symbol: String },

    #[error("insufficient history for '{symbol}': have {have} points, need {need}")]
    InsufficientData {
        symbol: String,
        have: usize,
        need: usize,
    },

    #[error("invalid alert config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// What `enabled = false` on an `AlertConfig` suppresses.
///
/// The price-target checks are always gated on `enabled`; volatility and
/// trend checks run unconditionally for monitored symbols unless the
/// engine was built with `AllAlerts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledAlertScope {
    PriceTargetsOnly,
    AllAlerts,
}

/// Summary statistics over a symbol's retained history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolStats {
    pub symbol: Symbol,
    pub current_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub volatility_pct: f64,
    pub data_points: usize,
    pub last_update: DateTime<Utc>,
}

/// Snapshot across every monitored symbol with recorded data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllStats {
    pub monitoring_count: usize,
    pub symbols: Vec<SymbolStats>,
}

#[derive(Default)]
struct SymbolState {
    history: SymbolHistory,
    config: Option<AlertConfig>,
}

/// Streaming alert engine. See the module docs for the locking model.
pub struct MonitorEngine {
    monitored: RwLock<HashSet<Symbol>>,
    states: RwLock<HashMap<Symbol, Arc<Mutex<SymbolState>>>>,
    listeners: RwLock<Vec<RegisteredListener>>,
    clock: Arc<dyn Clock>,
    disabled_scope: DisabledAlertScope,
}

impl Default for MonitorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorEngine {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::with_options(clock, DisabledAlertScope::PriceTargetsOnly)
    }

    pub fn with_options(clock: Arc<dyn Clock>, disabled_scope: DisabledAlertScope) -> Self {
        Self {
            monitored: RwLock::new(HashSet::new()),
            states: RwLock::new(HashMap::new()),
            listeners: RwLock::new(Vec::new()),
            clock,
            disabled_scope,
        }
    }

    /// Begin monitoring the given symbols. Idempotent per symbol.
    pub fn start_monitoring<I, S>(&self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut monitored = self.monitored.write();
        let mut states = self.states.write();
        let mut added = 0usize;
        for symbol in symbols {
            let symbol = symbol.into();
            states
                .entry(symbol.clone())
                .or_insert_with(|| Arc::new(Mutex::new(SymbolState::default())));
            if monitored.insert(symbol) {
                added += 1;
            }
        }
        tracing::info!(added, total = monitored.len(), "started monitoring");
    }

    /// Stop monitoring one symbol, or all of them. Clears the affected
    /// histories; alert configs are retained for a later restart.
    pub fn stop_monitoring(&self, symbol: Option<&str>) {
        match symbol {
            Some(symbol) => {
                self.monitored.write().remove(symbol);
                if let Some(state) = self.states.read().get(symbol) {
                    state.lock().history.clear();
                }
                tracing::info!(symbol, "stopped monitoring");
            }
            None => {
                self.monitored.write().clear();
                for state in self.states.read().values() {
                    state.lock().history.clear();
                }
                tracing::info!("stopped monitoring all symbols");
            }
        }
    }

    pub fn is_monitored(&self, symbol: &str) -> bool {
        self.monitored.read().contains(symbol)
    }

    pub fn monitored_symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.monitored.read().iter().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Set (replace) a symbol's alert config. Invalid configs are rejected
    /// and the previous valid config is retained.
    pub fn set_alert_config(&self, symbol: &str, config: AlertConfig) -> Result<(), MonitorError> {
        config.validate()?;
        let state = self.state_or_create(symbol);
        state.lock().config = Some(config);
        tracing::debug!(symbol, "alert config set");
        Ok(())
    }

    pub fn register_listener(&self, listener: Arc<dyn AlertListener>) {
        tracing::debug!(listener = listener.name(), "listener registered");
        self.listeners.write().push(RegisteredListener::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Record a price for a monitored symbol and evaluate its alert
    /// conditions. Returns the alerts fired (they are also dispatched to
    /// every registered listener). A no-op for unmonitored symbols.
    pub fn update(
        &self,
        symbol: &str,
        price: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> Vec<Alert> {
        if !self.monitored.read().contains(symbol) {
            return Vec::new();
        }
        let state = match self.states.read().get(symbol) {
            Some(state) => Arc::clone(state),
            None => return Vec::new(),
        };

        let timestamp = timestamp.unwrap_or_else(|| self.clock.now());
        let alerts = {
            let mut state = state.lock();
            state.history.push(PriceObservation::new(price, timestamp));
            self.evaluate(symbol, price, &state)
        };

        if !alerts.is_empty() {
            self.dispatch(&alerts);
        }
        alerts
    }

    /// The symbol's retained observations, oldest first.
    pub fn history(&self, symbol: &str) -> Vec<PriceObservation> {
        match self.states.read().get(symbol) {
            Some(state) => state.lock().history.iter().copied().collect(),
            None => Vec::new(),
        }
    }

    pub fn symbol_stats(&self, symbol: &str) -> Result<SymbolStats, MonitorError> {
        let state = self
            .states
            .read()
            .get(symbol)
            .cloned()
            .ok_or_else(|| MonitorError::NoData {
                symbol: symbol.to_string(),
            })?;
        let state = state.lock();
        let last = state.history.last().ok_or_else(|| MonitorError::NoData {
            symbol: symbol.to_string(),
        })?;

        let prices = state.history.prices();
        let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(SymbolStats {
            symbol: symbol.to_string(),
            current_price: last.price,
            min_price,
            max_price,
            avg_price: mean(&prices),
            volatility_pct: volatility_pct(&prices),
            data_points: prices.len(),
            last_update: last.timestamp,
        })
    }

    /// Stats for every monitored symbol that has recorded data.
    pub fn all_stats(&self) -> AllStats {
        let monitored = self.monitored_symbols();
        let symbols = monitored
            .iter()
            .filter_map(|symbol| self.symbol_stats(symbol).ok())
            .collect();
        AllStats {
            monitoring_count: monitored.len(),
            symbols,
        }
    }

    /// Run anomaly detection over the symbol's retained history.
    pub fn detect_anomalies(&self, symbol: &str) -> Result<AnomalyReport, MonitorError> {
        let state = self
            .states
            .read()
            .get(symbol)
            .cloned()
            .ok_or_else(|| MonitorError::NoData {
                symbol: symbol.to_string(),
            })?;
        let prices = state.lock().history.prices();
        if prices.is_empty() {
            return Err(MonitorError::NoData {
                symbol: symbol.to_string(),
            });
        }
        anomaly::detect_anomalies(&prices).map_err(|err| match err {
            AnalysisError::InsufficientData { have, need } => MonitorError::InsufficientData {
                symbol: symbol.to_string(),
                have,
                need,
            },
        })
    }

    fn state_or_create(&self, symbol: &str) -> Arc<Mutex<SymbolState>> {
        let mut states = self.states.write();
        Arc::clone(
            states
                .entry(symbol.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(SymbolState::default()))),
        )
    }

    /// Evaluate all alert conditions against the just-updated history.
    fn evaluate(&self, symbol: &str, price: f64, state: &SymbolState) -> Vec<Alert> {
        let mut alerts = Vec::new();

        let enabled = state.config.as_ref().map(|c| c.enabled).unwrap_or(true);
        if !enabled && self.disabled_scope == DisabledAlertScope::AllAlerts {
            return alerts;
        }

        if enabled {
            if let Some(config) = &state.config {
                self.check_price_targets(&mut alerts, symbol, price, config);
            }
        }

        let threshold = state
            .config
            .as_ref()
            .map(|c| c.volatility_threshold)
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(DEFAULT_VOLATILITY_THRESHOLD);

        let prices = state.history.prices();
        self.check_volatility(&mut alerts, symbol, &prices, threshold);
        self.check_trend_spike(&mut alerts, symbol, &prices);
        alerts
    }

    fn check_price_targets(
        &self,
        alerts: &mut Vec<Alert>,
        symbol: &str,
        price: f64,
        config: &AlertConfig,
    ) {
        if let Some(target) = config.target_high {
            if price >= target {
                alerts.push(self.alert(
                    AlertKind::PriceTarget,
                    symbol,
                    format!("{symbol} reached target high: ${price:.2}"),
                    Severity::High,
                    [("price", price), ("target", target)],
                ));
            }
        }
        if let Some(target) = config.target_low {
            if price <= target {
                alerts.push(self.alert(
                    AlertKind::PriceTarget,
                    symbol,
                    format!("{symbol} reached target low: ${price:.2}"),
                    Severity::High,
                    [("price", price), ("target", target)],
                ));
            }
        }
    }

    fn check_volatility(
        &self,
        alerts: &mut Vec<Alert>,
        symbol: &str,
        prices: &[f64],
        threshold: f64,
    ) {
        if prices.len() < VOLATILITY_CHECK_MIN_POINTS {
            return;
        }
        let recent = &prices[prices.len() - VOLATILITY_CHECK_MIN_POINTS..];
        let volatility = volatility_pct(recent);
        if volatility > threshold {
            alerts.push(self.alert(
                AlertKind::HighVolatility,
                symbol,
                format!("{symbol} showing high volatility: {volatility:.2}%"),
                Severity::Medium,
                [("volatility", volatility), ("current_price", recent[recent.len() - 1])],
            ));
        }
    }

    fn check_trend_spike(&self, alerts: &mut Vec<Alert>, symbol: &str, prices: &[f64]) {
        if prices.len() < TREND_CHECK_MIN_POINTS {
            return;
        }
        let recent = &prices[prices.len() - TREND_CHECK_MIN_POINTS..];
        let (long_term, short_term) = recent.split_at(TREND_CHECK_MIN_POINTS - SPIKE_SHORT_WINDOW);
        let short_avg = mean(short_term);
        let long_avg = mean(long_term);
        if long_avg == 0.0 {
            return;
        }
        let change_pct = (short_avg - long_avg) / long_avg * 100.0;
        let current = recent[recent.len() - 1];

        if change_pct > SPIKE_THRESHOLD_PCT {
            alerts.push(self.alert(
                AlertKind::PriceSpike,
                symbol,
                format!("{symbol} price spiked: +{change_pct:.2}%"),
                Severity::High,
                [("change_percent", change_pct), ("current_price", current)],
            ));
        } else if change_pct < -SPIKE_THRESHOLD_PCT {
            alerts.push(self.alert(
                AlertKind::PriceDrop,
                symbol,
                format!("{symbol} price dropped: {change_pct:.2}%"),
                Severity::High,
                [("change_percent", change_pct), ("current_price", current)],
            ));
        }
    }

    fn alert<const N: usize>(
        &self,
        kind: AlertKind,
        symbol: &str,
        message: String,
        severity: Severity,
        data: [(&str, f64); N],
    ) -> Alert {
        Alert {
            kind,
            symbol: symbol.to_string(),
            message,
            severity,
            timestamp: self.clock.now(),
            data: data.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    /// Broadcast alerts in order to every listener, isolating per-listener
    /// failures and dropping listeners that exhaust their failure budget.
    fn dispatch(&self, alerts: &[Alert]) {
        let mut tripped: Vec<Arc<dyn AlertListener>> = Vec::new();
        {
            let listeners = self.listeners.read();
            for alert in alerts {
                for registered in listeners.iter() {
                    let outcome = registered.listener.notify(alert);
                    if let Err(error) = &outcome {
                        tracing::warn!(
                            listener = registered.listener.name(),
                            %error,
                            "alert listener failed"
                        );
                    }
                    if registered.record_outcome(&outcome)
                        && !tripped.iter().any(|t| Arc::ptr_eq(t, &registered.listener))
                    {
                        tripped.push(Arc::clone(&registered.listener));
                    }
                }
            }
        }

        if !tripped.is_empty() {
            let mut listeners = self.listeners.write();
            listeners.retain(|registered| {
                let drop_it = tripped.iter().any(|t| Arc::ptr_eq(t, &registered.listener));
                if drop_it {
                    tracing::warn!(
                        listener = registered.listener.name(),
                        "dropping listener after {MAX_CONSECUTIVE_FAILURES} consecutive failures"
                    );
                }
                !drop_it
            });
        }
    }
}
