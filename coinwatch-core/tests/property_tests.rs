//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. History bound — after N pushes, len == min(N, 100), oldest-first
//! 2. RSI range — both backends stay inside [0, 100]
//! 3. Score clamp — the composite score stays inside [0, 100]
//! 4. Update ordering — the monitor's history mirrors its input order

use chrono::{Duration, TimeZone, Utc};
use coinwatch_core::analysis::{
    overall_score, Analyzer, ComputeBackend, IndicatorSet, MacdSignal, TradeSignals,
    TrendAnalysis, TrendDirection, TrendStrength,
};
use coinwatch_core::domain::{OhlcvBar, PriceObservation};
use coinwatch_core::history::{SymbolHistory, HISTORY_CAPACITY};
use coinwatch_core::monitor::MonitorEngine;
use proptest::prelude::*;

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), 1..max_len)
}

fn bars_from(closes: &[f64]) -> Vec<OhlcvBar> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            OhlcvBar {
                timestamp: base + Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

// ── 1. History bound ─────────────────────────────────────────────────

proptest! {
    /// After N pushes, len == min(N, 100) and order is oldest-to-newest.
    #[test]
    fn history_stays_bounded_and_ordered(prices in arb_prices(300)) {
        let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let mut history = SymbolHistory::new();
        for (i, &price) in prices.iter().enumerate() {
            history.push(PriceObservation::new(price, base + Duration::minutes(i as i64)));
        }

        prop_assert_eq!(history.len(), prices.len().min(HISTORY_CAPACITY));

        // The retained window is exactly the tail of the input, in order.
        let expected: Vec<f64> = prices
            .iter()
            .copied()
            .skip(prices.len().saturating_sub(HISTORY_CAPACITY))
            .collect();
        prop_assert_eq!(history.prices(), expected);

        // Timestamps are strictly increasing.
        let times: Vec<_> = history.iter().map(|o| o.timestamp).collect();
        prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
    }
}

// ── 2. RSI range ─────────────────────────────────────────────────────

proptest! {
    /// RSI stays inside [0, 100] for both backends, over arbitrary windows.
    #[test]
    fn rsi_stays_in_bounds(closes in prop::collection::vec(arb_price(), 20..120)) {
        let bars = bars_from(&closes);
        for analyzer in [Analyzer::exact(), Analyzer::approximate()] {
            let set = analyzer.indicator_set(&bars).unwrap();
            if let Some(rsi) = set.rsi {
                prop_assert!((0.0..=100.0).contains(&rsi), "rsi={rsi}");
            }
        }
    }
}

// ── 3. Score clamp ───────────────────────────────────────────────────

fn arb_direction() -> impl Strategy<Value = TrendDirection> {
    prop_oneof![
        Just(TrendDirection::Bullish),
        Just(TrendDirection::Bearish),
        Just(TrendDirection::Neutral),
    ]
}

fn arb_macd_signal() -> impl Strategy<Value = Option<MacdSignal>> {
    prop_oneof![
        Just(None),
        Just(Some(MacdSignal::Bullish)),
        Just(Some(MacdSignal::Bearish)),
        Just(Some(MacdSignal::Neutral)),
    ]
}

proptest! {
    /// The composite score is clamped to [0, 100] for every input shape.
    #[test]
    fn score_is_clamped(
        direction in arb_direction(),
        rsi in prop::option::of(0.0..100.0_f64),
        macd in arb_macd_signal(),
    ) {
        let trend = TrendAnalysis {
            direction,
            signals: vec![],
            strength: TrendStrength::Unknown,
        };
        let set = IndicatorSet {
            rsi,
            ..IndicatorSet::empty(ComputeBackend::Exact)
        };
        let signals = TradeSignals { rsi: None, macd };

        let result = overall_score(&trend, &set, &signals);
        prop_assert!((0..=100).contains(&result.score));
    }
}

// ── 4. Monitor history mirrors input ─────────────────────────────────

proptest! {
    /// The monitor's retained history is exactly the tail of the update
    /// stream for a monitored symbol.
    #[test]
    fn monitor_history_mirrors_updates(prices in arb_prices(150)) {
        let engine = MonitorEngine::new();
        engine.start_monitoring(["PROP"]);
        for &price in &prices {
            engine.update("PROP", price, None);
        }

        let recorded: Vec<f64> = engine.history("PROP").iter().map(|o| o.price).collect();
        let expected: Vec<f64> = prices
            .iter()
            .copied()
            .skip(prices.len().saturating_sub(HISTORY_CAPACITY))
            .collect();
        prop_assert_eq!(recorded, expected);
    }
}
