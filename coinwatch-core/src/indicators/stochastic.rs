//! Stochastic oscillator (%K / %D).
//!
//! %K = 100 * (close - lowest_low(k_period)) / (highest_high - lowest_low)
//! %D = SMA(d_period) of %K.
//! A flat window (highest_high == lowest_low) reads as neutral 50.
//! Lookback: k_period + d_period - 2.

use super::sma::sma;
use crate::domain::OhlcvBar;

/// %K and %D series, aligned to the input.
#[derive(Debug, Clone)]
pub struct StochasticSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

pub fn stochastic(bars: &[OhlcvBar], k_period: usize, d_period: usize) -> StochasticSeries {
    assert!(k_period >= 1 && d_period >= 1, "stochastic periods must be >= 1");
    let n = bars.len();
    let mut k = vec![f64::NAN; n];

    if n >= k_period {
        for i in (k_period - 1)..n {
            let window = &bars[i + 1 - k_period..=i];
            if window.iter().any(|b| b.is_void()) {
                continue;
            }
            let lowest = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
            let highest = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
            let range = highest - lowest;
            k[i] = if range == 0.0 {
                50.0
            } else {
                100.0 * (bars[i].close - lowest) / range
            };
        }
    }

    let d = sma(&k, d_period);
    StochasticSeries { k, d }
}
