//! The typed indicator bundle and its interpretation vocabulary.
//!
//! Absence is `None`, never a poisoned zero: an indicator that lacks the
//! bars it needs simply isn't present. Every set is tagged with the
//! backend that produced it so callers (and golden tests) can pin
//! expected values per backend.

use serde::{Deserialize, Serialize};

/// Which computation backend produced a result.
///
/// `Exact` uses library-grade closed forms (Wilder RSI/ATR/ADX, seeded
/// EMAs, population-stddev bands, real stochastic). `Approximate` is the
/// documented fallback: direct rolling means, sample-stddev bands, plain
/// high-low ranges, and fixed neutral placeholders for stochastic and ADX.
/// It is never substituted silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeBackend {
    Exact,
    Approximate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSignal {
    Oversold,
    Overbought,
    Neutral,
}

impl RsiSignal {
    /// <30 oversold, >70 overbought, else neutral.
    pub fn from_value(rsi: f64) -> Self {
        if rsi < 30.0 {
            RsiSignal::Oversold
        } else if rsi > 70.0 {
            RsiSignal::Overbought
        } else {
            RsiSignal::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdSignal {
    Bullish,
    Bearish,
    Neutral,
}

impl MacdSignal {
    /// Bullish when the line is above its signal with a positive
    /// histogram; bearish on the mirrored condition; else neutral.
    pub fn interpret(macd_line: f64, signal_line: f64, histogram: f64) -> Self {
        if macd_line > signal_line && histogram > 0.0 {
            MacdSignal::Bullish
        } else if macd_line < signal_line && histogram < 0.0 {
            MacdSignal::Bearish
        } else {
            MacdSignal::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSummary {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
    pub signal: MacdSignal,
}

/// Where the current close sits relative to the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPosition {
    AboveUpper,
    UpperHalf,
    LowerHalf,
    BelowLower,
}

impl BandPosition {
    pub fn classify(price: f64, upper: f64, middle: f64, lower: f64) -> Self {
        if price > upper {
            BandPosition::AboveUpper
        } else if price < lower {
            BandPosition::BelowLower
        } else if price > middle {
            BandPosition::UpperHalf
        } else {
            BandPosition::LowerHalf
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerSummary {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub position: BandPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityLevel {
    High,
    Medium,
    Low,
}

impl VolatilityLevel {
    /// ATR as a percentage of price: >5% high, >2% medium, else low.
    pub fn classify(atr: f64, price: f64) -> Self {
        let pct = (atr / price) * 100.0;
        if pct > 5.0 {
            VolatilityLevel::High
        } else if pct > 2.0 {
            VolatilityLevel::Medium
        } else {
            VolatilityLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtrSummary {
    pub value: f64,
    pub level: VolatilityLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StochasticSignal {
    Oversold,
    Overbought,
    Neutral,
}

impl StochasticSignal {
    /// Both lines under 20 → oversold; both over 80 → overbought.
    pub fn interpret(k: f64, d: f64) -> Self {
        if k < 20.0 && d < 20.0 {
            StochasticSignal::Oversold
        } else if k > 80.0 && d > 80.0 {
            StochasticSignal::Overbought
        } else {
            StochasticSignal::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticSummary {
    pub k: f64,
    pub d: f64,
    pub signal: StochasticSignal,
}

/// Trend strength vocabulary, sourced from ADX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
    Unknown,
}

impl TrendStrength {
    /// >50 very strong, >25 strong, else weak.
    pub fn from_adx(adx: f64) -> Self {
        if adx > 50.0 {
            TrendStrength::VeryStrong
        } else if adx > 25.0 {
            TrendStrength::Strong
        } else {
            TrendStrength::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdxSummary {
    pub value: f64,
    pub strength: TrendStrength,
}

/// Computed indicator bundle for one window. Not retained beyond the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub backend: ComputeBackend,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub ema_12: Option<f64>,
    pub ema_26: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_signal: Option<RsiSignal>,
    pub macd: Option<MacdSummary>,
    pub bollinger: Option<BollingerSummary>,
    pub atr: Option<AtrSummary>,
    pub stochastic: Option<StochasticSummary>,
    pub adx: Option<AdxSummary>,
}

impl IndicatorSet {
    pub fn empty(backend: ComputeBackend) -> Self {
        Self {
            backend,
            sma_20: None,
            sma_50: None,
            ema_12: None,
            ema_26: None,
            rsi: None,
            rsi_signal: None,
            macd: None,
            bollinger: None,
            atr: None,
            stochastic: None,
            adx: None,
        }
    }
}
