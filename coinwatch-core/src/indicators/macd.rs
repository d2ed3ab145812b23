//! Moving Average Convergence Divergence (MACD).
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA(signal_period) of
//! the MACD line; histogram = MACD - signal. Composed from the EMA
//! variants, so `macd` (seeded EMAs, exact backend) and `macd_running`
//! (from-first-value EMAs, approximate backend) diverge the same way the
//! underlying EMAs do.

use super::ema::{ema, ema_running};

/// The three MACD series, aligned to the input.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD from SMA-seeded EMAs. Lookback: slow + signal_period - 2.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    assert!(fast >= 1 && slow > fast, "MACD requires slow > fast >= 1");
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);
    let line = difference(&fast_ema, &slow_ema);
    // The line has a NaN warmup; seed the signal EMA from its first finite run.
    let signal = ema_of_suffix(&line, signal_period);
    finish(line, signal)
}

/// MACD from running EMAs, defined from index 0.
pub fn macd_running(values: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    assert!(fast >= 1 && slow > fast, "MACD requires slow > fast >= 1");
    let fast_ema = ema_running(values, fast);
    let slow_ema = ema_running(values, slow);
    let line = difference(&fast_ema, &slow_ema);
    let signal = ema_running(&line, signal_period);
    finish(line, signal)
}

fn difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| if x.is_nan() || y.is_nan() { f64::NAN } else { x - y })
        .collect()
}

fn ema_of_suffix(line: &[f64], period: usize) -> Vec<f64> {
    let mut signal = vec![f64::NAN; line.len()];
    if let Some(start) = line.iter().position(|v| !v.is_nan()) {
        let suffix = ema(&line[start..], period);
        signal[start..].copy_from_slice(&suffix);
    }
    signal
}

fn finish(line: Vec<f64>, signal: Vec<f64>) -> MacdSeries {
    let histogram = difference(&line, &signal);
    MacdSeries {
        macd: line,
        signal,
        histogram,
    }
}
