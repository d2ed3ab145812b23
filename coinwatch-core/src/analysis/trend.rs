//! Trend direction and per-indicator trade signals.
//!
//! Binary moving-average signals are tallied into an overall direction by
//! strict majority; strength comes from the ADX tag when one is present.

use super::set::{IndicatorSet, MacdSignal, RsiSignal, TrendStrength};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Bullish,
    Bearish,
    Neutral,
}

/// Individual moving-average observations feeding the direction tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    /// sma_20 above sma_50.
    BullishMa,
    /// sma_20 at or below sma_50.
    BearishMa,
    /// Close above sma_20.
    AboveSma20,
    /// Close at or below sma_20.
    BelowSma20,
}

impl TrendSignal {
    pub fn is_bullish(self) -> bool {
        matches!(self, TrendSignal::BullishMa | TrendSignal::AboveSma20)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub signals: Vec<TrendSignal>,
    pub strength: TrendStrength,
}

/// Classify the trend from the current close and the indicator bundle.
///
/// The MA-cross signal only participates when both averages are present
/// (sma_50 needs 50 bars); the close-vs-sma_20 signal when sma_20 is.
pub fn classify_trend(close: f64, set: &IndicatorSet) -> TrendAnalysis {
    let mut signals = Vec::with_capacity(2);

    if let (Some(sma_20), Some(sma_50)) = (set.sma_20, set.sma_50) {
        signals.push(if sma_20 > sma_50 {
            TrendSignal::BullishMa
        } else {
            TrendSignal::BearishMa
        });
    }

    if let Some(sma_20) = set.sma_20 {
        signals.push(if close > sma_20 {
            TrendSignal::AboveSma20
        } else {
            TrendSignal::BelowSma20
        });
    }

    let bullish = signals.iter().filter(|s| s.is_bullish()).count();
    let bearish = signals.len() - bullish;

    let direction = if signals.is_empty() || bullish == bearish {
        TrendDirection::Neutral
    } else if bullish > bearish {
        TrendDirection::Bullish
    } else {
        TrendDirection::Bearish
    };

    let strength = set
        .adx
        .as_ref()
        .map(|a| a.strength)
        .unwrap_or(TrendStrength::Unknown);

    TrendAnalysis {
        direction,
        signals,
        strength,
    }
}

/// Per-indicator trade signal from RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiTradeSignal {
    OversoldBuy,
    OverboughtSell,
    Neutral,
}

impl From<RsiSignal> for RsiTradeSignal {
    fn from(signal: RsiSignal) -> Self {
        match signal {
            RsiSignal::Oversold => RsiTradeSignal::OversoldBuy,
            RsiSignal::Overbought => RsiTradeSignal::OverboughtSell,
            RsiSignal::Neutral => RsiTradeSignal::Neutral,
        }
    }
}

/// Trade signals derived from the indicator bundle; each is present only
/// when its indicator is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignals {
    pub rsi: Option<RsiTradeSignal>,
    pub macd: Option<MacdSignal>,
}

pub fn trade_signals(set: &IndicatorSet) -> TradeSignals {
    TradeSignals {
        rsi: set.rsi.map(RsiSignal::from_value).map(RsiTradeSignal::from),
        macd: set.macd.as_ref().map(|m| m.signal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::set::{AdxSummary, ComputeBackend, MacdSummary};

    fn set_with(sma_20: Option<f64>, sma_50: Option<f64>) -> IndicatorSet {
        IndicatorSet {
            sma_20,
            sma_50,
            ..IndicatorSet::empty(ComputeBackend::Exact)
        }
    }

    #[test]
    fn both_bullish_signals_give_bullish_direction() {
        let set = set_with(Some(100.0), Some(95.0));
        let trend = classify_trend(105.0, &set);
        assert_eq!(trend.direction, TrendDirection::Bullish);
        assert_eq!(trend.signals, vec![TrendSignal::BullishMa, TrendSignal::AboveSma20]);
    }

    #[test]
    fn both_bearish_signals_give_bearish_direction() {
        let set = set_with(Some(100.0), Some(105.0));
        let trend = classify_trend(95.0, &set);
        assert_eq!(trend.direction, TrendDirection::Bearish);
        assert_eq!(trend.signals, vec![TrendSignal::BearishMa, TrendSignal::BelowSma20]);
    }

    #[test]
    fn split_signals_are_neutral() {
        let set = set_with(Some(100.0), Some(95.0));
        let trend = classify_trend(99.0, &set); // bullish MA, below sma_20
        assert_eq!(trend.direction, TrendDirection::Neutral);
    }

    #[test]
    fn missing_sma50_uses_single_signal() {
        let set = set_with(Some(100.0), None);
        let trend = classify_trend(105.0, &set);
        assert_eq!(trend.direction, TrendDirection::Bullish);
        assert_eq!(trend.signals, vec![TrendSignal::AboveSma20]);
    }

    #[test]
    fn no_indicators_is_neutral_with_no_signals() {
        let set = set_with(None, None);
        let trend = classify_trend(105.0, &set);
        assert_eq!(trend.direction, TrendDirection::Neutral);
        assert!(trend.signals.is_empty());
    }

    #[test]
    fn strength_comes_from_adx_else_unknown() {
        let mut set = set_with(Some(100.0), None);
        assert_eq!(classify_trend(105.0, &set).strength, TrendStrength::Unknown);

        set.adx = Some(AdxSummary {
            value: 30.0,
            strength: TrendStrength::Strong,
        });
        assert_eq!(classify_trend(105.0, &set).strength, TrendStrength::Strong);
    }

    #[test]
    fn trade_signals_follow_indicator_presence() {
        let mut set = IndicatorSet::empty(ComputeBackend::Approximate);
        let signals = trade_signals(&set);
        assert!(signals.rsi.is_none());
        assert!(signals.macd.is_none());

        set.rsi = Some(25.0);
        set.macd = Some(MacdSummary {
            macd_line: 1.0,
            signal_line: 0.5,
            histogram: 0.5,
            signal: MacdSignal::Bullish,
        });
        let signals = trade_signals(&set);
        assert_eq!(signals.rsi, Some(RsiTradeSignal::OversoldBuy));
        assert_eq!(signals.macd, Some(MacdSignal::Bullish));
    }
}
