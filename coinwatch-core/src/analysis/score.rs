//! Composite 0-100 score from trend, RSI, and MACD.
//!
//! A fixed linear rule table. The point values and thresholds are part of
//! the behavioral contract and must not drift:
//! start 50; trend ±15; RSI in [30,70] +5, <20 +10, >80 −10; MACD ±10;
//! clamp to [0,100].

use super::set::{IndicatorSet, MacdSignal};
use super::trend::{TrendAnalysis, TrendDirection, TradeSignals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreVerdict {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl ScoreVerdict {
    /// ≥70 strong_buy, ≥60 buy, ≥40 neutral, ≥30 sell, else strong_sell.
    pub fn from_score(score: i32) -> Self {
        if score >= 70 {
            ScoreVerdict::StrongBuy
        } else if score >= 60 {
            ScoreVerdict::Buy
        } else if score >= 40 {
            ScoreVerdict::Neutral
        } else if score >= 30 {
            ScoreVerdict::Sell
        } else {
            ScoreVerdict::StrongSell
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallScore {
    pub score: i32,
    pub interpretation: ScoreVerdict,
}

pub fn overall_score(
    trend: &TrendAnalysis,
    set: &IndicatorSet,
    signals: &TradeSignals,
) -> OverallScore {
    let mut score: i32 = 50;

    match trend.direction {
        TrendDirection::Bullish => score += 15,
        TrendDirection::Bearish => score -= 15,
        TrendDirection::Neutral => {}
    }

    if let Some(rsi) = set.rsi {
        if (30.0..=70.0).contains(&rsi) {
            score += 5; // stable momentum
        } else if rsi < 20.0 {
            score += 10; // deeply oversold
        } else if rsi > 80.0 {
            score -= 10; // deeply overbought
        }
    }

    match signals.macd {
        Some(MacdSignal::Bullish) => score += 10,
        Some(MacdSignal::Bearish) => score -= 10,
        _ => {}
    }

    let score = score.clamp(0, 100);
    OverallScore {
        score,
        interpretation: ScoreVerdict::from_score(score),
    }
}
