//! Series-level indicator math.
//!
//! Every function returns a series aligned to its input, with `f64::NAN`
//! for warmup positions. A NaN input value taints the affected window (and
//! everything after it for recursive indicators) rather than producing a
//! fabricated number. The analysis engine extracts the latest finite value
//! into a typed `IndicatorSet`.
//!
//! Where the exact and approximate compute backends diverge, both variants
//! live side by side (`ema`/`ema_running`, `rsi_wilder`/`rsi_rolling`,
//! `atr`/`range_mean`); the engine chooses per backend.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use adx::adx;
pub use atr::{atr, range_mean, true_range, wilder_smooth};
pub use bollinger::{bollinger, BollingerSeries, StdDev};
pub use ema::{ema, ema_running};
pub use macd::{macd, macd_running, MacdSeries};
pub use rsi::{rsi_rolling, rsi_wilder};
pub use sma::sma;
pub use stochastic::{stochastic, StochasticSeries};

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev close (or close for the first
/// bar), high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::OhlcvBar> {
    use crate::domain::OhlcvBar;
    use chrono::{Duration, TimeZone, Utc};
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

/// Create bars from explicit (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::OhlcvBar> {
    use crate::domain::OhlcvBar;
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| OhlcvBar {
            timestamp: base + Duration::hours(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
