//! Relative Strength Index (RSI).
//!
//! Two variants with materially different outputs:
//! - `rsi_wilder`: Wilder smoothing of average gains/losses, the
//!   exact-backend form. avg_loss == 0 with gains → 100; flat → 50.
//! - `rsi_rolling`: plain rolling means of gains/losses over the trailing
//!   `period` deltas, the approximate-backend form. A rolling loss mean of
//!   exactly 0 reports neutral 50.0 rather than dividing by zero.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss). Lookback: period.

/// Wilder-smoothed RSI.
pub fn rsi_wilder(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "RSI period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period + 1 {
        return result;
    }

    let changes = deltas(values);

    // Seed: mean gain and mean loss over the first `period` changes.
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for &change in &changes[1..=period] {
        if change.is_nan() {
            return result;
        }
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss -= change;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    result[period] = wilder_value(avg_gain, avg_loss);

    let alpha = 1.0 / period as f64;
    for i in (period + 1)..n {
        if changes[i].is_nan() {
            return result;
        }
        let gain = changes[i].max(0.0);
        let loss = (-changes[i]).max(0.0);
        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        result[i] = wilder_value(avg_gain, avg_loss);
    }

    result
}

/// Rolling-mean RSI. Gains/losses are averaged over the trailing `period`
/// deltas with no smoothing memory.
pub fn rsi_rolling(values: &[f64], period: usize) -> Vec<f64> {
    assert!(period >= 1, "RSI period must be >= 1");
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period + 1 {
        return result;
    }

    let changes = deltas(values);

    for i in period..n {
        let window = &changes[i + 1 - period..=i];
        if window.iter().any(|c| c.is_nan()) {
            continue;
        }
        let gain_mean = window.iter().map(|c| c.max(0.0)).sum::<f64>() / period as f64;
        let loss_mean = window.iter().map(|c| (-c).max(0.0)).sum::<f64>() / period as f64;

        result[i] = if loss_mean == 0.0 {
            50.0
        } else {
            100.0 - 100.0 / (1.0 + gain_mean / loss_mean)
        };
    }

    result
}

fn deltas(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut changes = vec![f64::NAN; n];
    for i in 1..n {
        let (prev, curr) = (values[i - 1], values[i]);
        if !prev.is_nan() && !curr.is_nan() {
            changes[i] = curr - prev;
        }
    }
    changes
}

fn wilder_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
