//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! The exact backend uses population stddev (divide by N); the approximate
//! backend uses sample stddev (divide by N-1), matching rolling-std
//! conventions in dataframe libraries. Lookback: period - 1.

/// Which stddev divisor to use for the band width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdDev {
    /// Divide by N.
    Population,
    /// Divide by N - 1. Requires period >= 2.
    Sample,
}

/// Upper/middle/lower band series, aligned to the input.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

pub fn bollinger(values: &[f64], period: usize, multiplier: f64, stddev: StdDev) -> BollingerSeries {
    assert!(period >= 1, "Bollinger period must be >= 1");
    assert!(
        stddev == StdDev::Population || period >= 2,
        "sample stddev requires period >= 2"
    );

    let n = values.len();
    let mut upper = vec![f64::NAN; n];
    let mut middle = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];

    if n >= period {
        let divisor = match stddev {
            StdDev::Population => period as f64,
            StdDev::Sample => (period - 1) as f64,
        };

        for i in (period - 1)..n {
            let window = &values[i + 1 - period..=i];
            if window.iter().any(|v| v.is_nan()) {
                continue;
            }
            let mean = window.iter().sum::<f64>() / period as f64;
            let variance = window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / divisor;
            let width = multiplier * variance.sqrt();
            middle[i] = mean;
            upper[i] = mean + width;
            lower[i] = mean - width;
        }
    }

    BollingerSeries { upper, middle, lower }
}
