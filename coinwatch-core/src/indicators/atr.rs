//! Average True Range (ATR) and the plain-range fallback.
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|).
//! `atr` applies Wilder smoothing (alpha = 1/period) to the TR series —
//! the exact-backend form. `range_mean` is the approximate-backend form:
//! a rolling mean of (high - low), ignoring gaps across bars.

use crate::domain::OhlcvBar;

/// True Range series. TR[0] has no previous close and is left NaN so the
/// Wilder seed starts from TR[1].
pub fn true_range(bars: &[OhlcvBar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let prev_close = bars[i - 1].close;
        if h.is_nan() || l.is_nan() || prev_close.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - prev_close).abs()).max((l - prev_close).abs());
    }

    tr
}

/// Wilder smoothing: seed with the mean of the first `period` finite
/// values after any leading NaNs, then recurse with alpha = 1/period.
/// A NaN inside the seed window or after it leaves the tail NaN.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "Wilder period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    let start = match values.iter().position(|v| !v.is_nan()) {
        Some(s) => s,
        None => return result,
    };
    if start + period > n {
        return result;
    }

    let seed_window = &values[start..start + period];
    if seed_window.iter().any(|v| v.is_nan()) {
        return result;
    }
    let seed = seed_window.iter().sum::<f64>() / period as f64;
    result[start + period - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in (start + period)..n {
        if values[i].is_nan() {
            return result;
        }
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

/// Wilder-smoothed ATR. Lookback: period (TR needs a previous close).
pub fn atr(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    wilder_smooth(&true_range(bars), period)
}

/// Rolling mean of (high - low) over `period` bars. Lookback: period - 1.
pub fn range_mean(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    assert!(period >= 1, "range period must be >= 1");
    let n = bars.len();
    let mut result = vec![f64::NAN; n];

    if n < period {
        return result;
    }

    let ranges: Vec<f64> = bars
        .iter()
        .map(|b| {
            if b.high.is_nan() || b.low.is_nan() {
                f64::NAN
            } else {
                b.high - b.low
            }
        })
        .collect();

    for i in (period - 1)..n {
        let window = &ranges[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().sum::<f64>() / period as f64;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR undefined (no prev close)
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert!(tr[0].is_nan());
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Gap up: prev close 100, current bar 110-115-108.
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        assert_approx(true_range(&bars)[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ]);
        let result = atr(&bars, 3);
        assert!(result[2].is_nan());
        // Seed over TR[1..=3] = [8, 9, 6]: ATR[3] = 23/3.
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        // ATR[4] = (1/3)*6 + (2/3)*(23/3) = 64/9.
        assert_approx(result[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn range_mean_ignores_gaps() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // range 10
            (110.0, 115.0, 108.0, 112.0), // range 7, despite the gap
            (112.0, 118.0, 110.0, 113.0), // range 8
        ]);
        let result = range_mean(&bars, 2);
        assert!(result[0].is_nan());
        assert_approx(result[1], 8.5, DEFAULT_EPSILON);
        assert_approx(result[2], 7.5, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_smooth_skips_leading_nan() {
        let values = [f64::NAN, f64::NAN, 4.0, 6.0, 8.0];
        let result = wilder_smooth(&values, 2);
        assert!(result[2].is_nan());
        assert_approx(result[3], 5.0, DEFAULT_EPSILON); // seed mean(4, 6)
        assert_approx(result[4], 0.5 * 8.0 + 0.5 * 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_smooth_all_nan_when_too_short() {
        let result = wilder_smooth(&[f64::NAN, 1.0], 2);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
