//! Batch analysis entry points: `analyze`, `quick_analyze`, `indicator_set`.
//!
//! Stateless and pure: results are a function of the input window alone,
//! so repeated calls over identical bars are bit-identical (`as_of` is the
//! last bar's timestamp, not wall clock). Independent indicator groups are
//! computed in parallel.
//!
//! Backend note: the exact backend's seeded EMAs need a full `period` of
//! bars before they produce values, so `ema_26` and `macd` stay `None` on
//! short windows where the approximate backend (which recurses from the
//! first value) already reports them. The backend tag on every result
//! makes this visible to callers.

use crate::domain::OhlcvBar;
use crate::error::AnalysisError;
use crate::indicators::{
    adx, atr, bollinger, ema, ema_running, macd, macd_running, range_mean, rsi_rolling,
    rsi_wilder, sma, stochastic, StdDev,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::score::{overall_score, OverallScore};
use super::set::{
    AdxSummary, AtrSummary, BandPosition, BollingerSummary, ComputeBackend, IndicatorSet,
    MacdSignal, MacdSummary, RsiSignal, StochasticSignal, StochasticSummary, TrendStrength,
    VolatilityLevel,
};
use super::trend::{classify_trend, trade_signals, TradeSignals, TrendAnalysis};

/// Minimum bars for the full indicator set.
pub const FULL_ANALYSIS_MIN_BARS: usize = 20;
/// Minimum bars for the quick subset.
pub const QUICK_ANALYSIS_MIN_BARS: usize = 10;

const SMA_SHORT: usize = 20;
const SMA_LONG: usize = 50;
const EMA_FAST: usize = 12;
const EMA_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const RSI_PERIOD: usize = 14;
const BOLLINGER_PERIOD: usize = 20;
const BOLLINGER_MULT: f64 = 2.0;
const ATR_PERIOD: usize = 14;
const STOCHASTIC_K: usize = 14;
const STOCHASTIC_D: usize = 3;
const ADX_PERIOD: usize = 14;
const LEVEL_WINDOW: usize = 20;
const LEVEL_COUNT: usize = 3;
const QUICK_SMA: usize = 10;
const QUICK_RSI_MIN_BARS: usize = 14;
const QUICK_TREND_WINDOW: usize = 5;

/// Recent swing levels: up to three distinct highs (descending) and three
/// distinct lows (ascending) from the last 20 bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
}

/// Full batch analysis output, JSON-shaped for the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub indicators: IndicatorSet,
    pub trend: TrendAnalysis,
    pub signals: TradeSignals,
    pub support_resistance: SupportResistance,
    pub overall_score: OverallScore,
    pub last_price: f64,
    pub change_pct: f64,
    pub as_of: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickTrend {
    Uptrend,
    Downtrend,
    Sideways,
}

/// Lightweight real-time subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickAnalysis {
    pub backend: ComputeBackend,
    pub price: f64,
    pub change_pct: f64,
    pub trend: QuickTrend,
    pub rsi: Option<f64>,
    pub sma_10: Option<f64>,
    pub price_vs_sma10: Option<f64>,
    pub as_of: DateTime<Utc>,
}

/// Stateless indicator engine; the backend is fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    backend: ComputeBackend,
}

impl Analyzer {
    pub fn new(backend: ComputeBackend) -> Self {
        Self { backend }
    }

    pub fn exact() -> Self {
        Self::new(ComputeBackend::Exact)
    }

    pub fn approximate() -> Self {
        Self::new(ComputeBackend::Approximate)
    }

    pub fn backend(&self) -> ComputeBackend {
        self.backend
    }

    /// Compute the indicator bundle over a window (oldest-first).
    pub fn indicator_set(&self, bars: &[OhlcvBar]) -> Result<IndicatorSet, AnalysisError> {
        AnalysisError::require(bars.len(), FULL_ANALYSIS_MIN_BARS)?;

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let last_close = closes[closes.len() - 1];

        let (close_based, bar_based) = rayon::join(
            || self.close_based(&closes, last_close),
            || self.bar_based(bars, last_close),
        );

        let mut set = close_based;
        let (atr, stochastic, adx) = bar_based;
        set.atr = atr;
        set.stochastic = stochastic;
        set.adx = adx;
        Ok(set)
    }

    /// Full analysis: indicators, trend, trade signals, swing levels,
    /// composite score.
    pub fn analyze(&self, bars: &[OhlcvBar]) -> Result<AnalysisResult, AnalysisError> {
        let set = self.indicator_set(bars)?;

        // indicator_set enforced the minimum, so the window is non-empty.
        let first = &bars[0];
        let last = &bars[bars.len() - 1];

        let trend = classify_trend(last.close, &set);
        let signals = trade_signals(&set);
        let overall = overall_score(&trend, &set, &signals);

        Ok(AnalysisResult {
            trend,
            signals,
            support_resistance: swing_levels(bars),
            overall_score: overall,
            last_price: last.close,
            change_pct: percent_change(first.close, last.close),
            as_of: last.timestamp,
            indicators: set,
        })
    }

    /// Quick real-time subset over a shorter window.
    pub fn quick_analyze(&self, bars: &[OhlcvBar]) -> Result<QuickAnalysis, AnalysisError> {
        AnalysisError::require(bars.len(), QUICK_ANALYSIS_MIN_BARS)?;

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let price = closes[closes.len() - 1];

        let (rsi, sma_10) = if bars.len() >= QUICK_RSI_MIN_BARS {
            (
                last_finite(&self.rsi_series(&closes)),
                last_finite(&sma(&closes, QUICK_SMA)),
            )
        } else {
            (None, None)
        };

        Ok(QuickAnalysis {
            backend: self.backend,
            price,
            change_pct: percent_change(closes[0], price),
            trend: quick_trend(&closes),
            rsi,
            sma_10,
            price_vs_sma10: sma_10.map(|s| price - s),
            as_of: bars[bars.len() - 1].timestamp,
        })
    }

    fn close_based(&self, closes: &[f64], last_close: f64) -> IndicatorSet {
        let mut set = IndicatorSet::empty(self.backend);

        set.sma_20 = last_finite(&sma(closes, SMA_SHORT));
        if closes.len() >= SMA_LONG {
            set.sma_50 = last_finite(&sma(closes, SMA_LONG));
        }

        let (ema_fast, ema_slow, macd_series) = match self.backend {
            ComputeBackend::Exact => (
                ema(closes, EMA_FAST),
                ema(closes, EMA_SLOW),
                macd(closes, EMA_FAST, EMA_SLOW, MACD_SIGNAL),
            ),
            ComputeBackend::Approximate => (
                ema_running(closes, EMA_FAST),
                ema_running(closes, EMA_SLOW),
                macd_running(closes, EMA_FAST, EMA_SLOW, MACD_SIGNAL),
            ),
        };
        set.ema_12 = last_finite(&ema_fast);
        set.ema_26 = last_finite(&ema_slow);

        set.rsi = last_finite(&self.rsi_series(closes));
        set.rsi_signal = set.rsi.map(RsiSignal::from_value);

        if let (Some(line), Some(signal), Some(histogram)) = (
            last_finite(&macd_series.macd),
            last_finite(&macd_series.signal),
            last_finite(&macd_series.histogram),
        ) {
            set.macd = Some(MacdSummary {
                macd_line: line,
                signal_line: signal,
                histogram,
                signal: MacdSignal::interpret(line, signal, histogram),
            });
        }

        let stddev = match self.backend {
            ComputeBackend::Exact => StdDev::Population,
            ComputeBackend::Approximate => StdDev::Sample,
        };
        let bands = bollinger(closes, BOLLINGER_PERIOD, BOLLINGER_MULT, stddev);
        if let (Some(upper), Some(middle), Some(lower)) = (
            last_finite(&bands.upper),
            last_finite(&bands.middle),
            last_finite(&bands.lower),
        ) {
            set.bollinger = Some(BollingerSummary {
                upper,
                middle,
                lower,
                position: BandPosition::classify(last_close, upper, middle, lower),
            });
        }

        set
    }

    #[allow(clippy::type_complexity)]
    fn bar_based(
        &self,
        bars: &[OhlcvBar],
        last_close: f64,
    ) -> (Option<AtrSummary>, Option<StochasticSummary>, Option<AdxSummary>) {
        let atr_series = match self.backend {
            ComputeBackend::Exact => atr(bars, ATR_PERIOD),
            ComputeBackend::Approximate => range_mean(bars, ATR_PERIOD),
        };
        let atr_summary = last_finite(&atr_series).map(|value| AtrSummary {
            value,
            level: VolatilityLevel::classify(value, last_close),
        });

        match self.backend {
            ComputeBackend::Exact => {
                let stoch = stochastic(bars, STOCHASTIC_K, STOCHASTIC_D);
                let stochastic_summary = match (last_finite(&stoch.k), last_finite(&stoch.d)) {
                    (Some(k), Some(d)) => Some(StochasticSummary {
                        k,
                        d,
                        signal: StochasticSignal::interpret(k, d),
                    }),
                    _ => None,
                };
                let adx_summary = last_finite(&adx(bars, ADX_PERIOD)).map(|value| AdxSummary {
                    value,
                    strength: TrendStrength::from_adx(value),
                });
                (atr_summary, stochastic_summary, adx_summary)
            }
            // Degraded mode: no precise stochastic/ADX backend. Fixed
            // neutral placeholders, per the interface contract.
            ComputeBackend::Approximate => (
                atr_summary,
                Some(StochasticSummary {
                    k: 50.0,
                    d: 50.0,
                    signal: StochasticSignal::Neutral,
                }),
                Some(AdxSummary {
                    value: 25.0,
                    strength: TrendStrength::Moderate,
                }),
            ),
        }
    }

    fn rsi_series(&self, closes: &[f64]) -> Vec<f64> {
        match self.backend {
            ComputeBackend::Exact => rsi_wilder(closes, RSI_PERIOD),
            ComputeBackend::Approximate => rsi_rolling(closes, RSI_PERIOD),
        }
    }
}

fn last_finite(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|v| v.is_finite())
}

fn percent_change(first: f64, last: f64) -> f64 {
    let change = (last - first) / first * 100.0;
    (change * 100.0).round() / 100.0
}

/// Least-squares slope over the last few closes.
fn quick_trend(closes: &[f64]) -> QuickTrend {
    let window = &closes[closes.len().saturating_sub(QUICK_TREND_WINDOW)..];
    let n = window.len() as f64;
    let x_mean = (window.len() - 1) as f64 / 2.0;
    let y_mean = window.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in window.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }
    let slope = if denominator == 0.0 { 0.0 } else { numerator / denominator };

    if slope > 0.0 {
        QuickTrend::Uptrend
    } else if slope < 0.0 {
        QuickTrend::Downtrend
    } else {
        QuickTrend::Sideways
    }
}

/// Up to three distinct highs/lows from the last 20 bars.
fn swing_levels(bars: &[OhlcvBar]) -> SupportResistance {
    let recent = &bars[bars.len().saturating_sub(LEVEL_WINDOW)..];

    let mut resistance: Vec<f64> = recent.iter().map(|b| b.high).filter(|v| v.is_finite()).collect();
    resistance.sort_by(|a, b| b.total_cmp(a));
    resistance.truncate(LEVEL_COUNT);
    resistance.dedup();

    let mut support: Vec<f64> = recent.iter().map(|b| b.low).filter(|v| v.is_finite()).collect();
    support.sort_by(f64::total_cmp);
    support.truncate(LEVEL_COUNT);
    support.dedup();

    SupportResistance { support, resistance }
}
