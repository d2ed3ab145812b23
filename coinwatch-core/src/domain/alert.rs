//! Alert records, severities, and per-symbol alert configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Fallback volatility threshold (percent) when a config omits or
/// mis-specifies one.
pub const DEFAULT_VOLATILITY_THRESHOLD: f64 = 5.0;

/// Alert categories the monitor can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    PriceTarget,
    HighVolatility,
    PriceSpike,
    PriceDrop,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::PriceTarget => "price_target",
            AlertKind::HighVolatility => "high_volatility",
            AlertKind::PriceSpike => "price_spike",
            AlertKind::PriceDrop => "price_drop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One dispatched alert. Immutable; persistence is the transport layer's concern.
///
/// `data` carries the numeric payload each alert kind attaches (price,
/// target, volatility, change_percent, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub symbol: String,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub data: HashMap<String, f64>,
}

/// Per-symbol alert configuration. At most one per symbol; last write wins.
///
/// Absence of a config means no price-target checks fire for that symbol;
/// volatility and trend checks run once the symbol is monitored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    pub target_high: Option<f64>,
    pub target_low: Option<f64>,
    pub volatility_threshold: f64,
    pub enabled: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            target_high: None,
            target_low: None,
            volatility_threshold: DEFAULT_VOLATILITY_THRESHOLD,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("volatility threshold must be positive and finite, got {got}")]
    NonPositiveThreshold { got: String },
}

impl AlertConfig {
    /// Validate at config-set time. The monitor rejects invalid configs and
    /// retains the previous valid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.volatility_threshold.is_finite() || self.volatility_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold {
                got: self.volatility_threshold.to_string(),
            });
        }
        Ok(())
    }
}
