//! Small shared statistics helpers.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N). Returns 0.0 for an empty slice.
pub(crate) fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Standard deviation as a percentage of the mean. A zero mean reads as 0%.
pub(crate) fn volatility_pct(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 {
        return 0.0;
    }
    population_std(values) / m * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn mean_basic() {
        assert_approx(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5, DEFAULT_EPSILON);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn population_std_known_value() {
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] is 4 (population).
        assert_approx(
            population_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]),
            2.0,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn constant_series_has_zero_std() {
        assert_eq!(population_std(&[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(volatility_pct(&[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn volatility_pct_scales_with_mean() {
        // Same shape at 10x the level → same percentage volatility.
        let a = volatility_pct(&[10.0, 11.0, 12.0]);
        let b = volatility_pct(&[100.0, 110.0, 120.0]);
        assert_approx(a, b, 1e-9);
    }
}
