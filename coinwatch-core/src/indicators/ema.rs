//! Exponential Moving Average (EMA).
//!
//! Two variants with materially different outputs:
//! - `ema`: SMA-seeded recursion, the exact-backend form.
//!   EMA[period-1] = SMA of the first `period` values, then
//!   EMA[t] = alpha * value[t] + (1 - alpha) * EMA[t-1]. Lookback: period - 1.
//! - `ema_running`: seeded with the first value and recursed from index 1,
//!   the approximate-backend form (no warmup, early values biased toward
//!   the series start).
//!
//! Both use alpha = 2 / (period + 1).

/// SMA-seeded recursive EMA.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "EMA period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let seed_window = &values[..period];
    if seed_window.iter().any(|v| v.is_nan()) {
        return result; // NaN in seed window → all NaN
    }
    let seed = seed_window.iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            // NaN propagates: subsequent values are tainted.
            return result;
        }
        let next = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = next;
        prev = next;
    }

    result
}

/// First-value-seeded recursive EMA, defined from index 0.
pub fn ema_running(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "EMA period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n == 0 || values[0].is_nan() {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    result[0] = values[0];

    let mut prev = values[0];
    for i in 1..n {
        if values[i].is_nan() {
            return result;
        }
        let next = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = next;
        prev = next;
    }

    result
}
