//! Statistical anomaly detection over recent price history.
//!
//! Two detectors:
//! - z-score outlier: how far the latest price sits from the history mean,
//!   flagged strictly beyond 2 standard deviations;
//! - direction streak: the unbroken run of same-sign deltas ending at the
//!   most recent price, over the last 10 prices. A zero delta breaks the
//!   run immediately — ties count for neither direction.

use crate::error::AnalysisError;
use crate::stats::{mean, population_std};
use serde::{Deserialize, Serialize};

/// Minimum history for anomaly detection.
pub const ANOMALY_MIN_POINTS: usize = 30;
/// Prices inspected by the streak detector.
pub const STREAK_WINDOW: usize = 10;
/// Run length that qualifies as an extended trend.
pub const STREAK_MIN_RUN: usize = 5;
/// |z| beyond which the latest price is an outlier (strict).
pub const OUTLIER_Z_THRESHOLD: f64 = 2.0;

/// One detected anomaly, tagged for the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Anomaly {
    PriceOutlier { z_score: f64, description: String },
    ExtendedUptrend { streak_length: usize, description: String },
    ExtendedDowntrend { streak_length: usize, description: String },
}

/// Detection result. Empty `anomalies` is a valid outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
    pub z_score: f64,
    pub current_price: f64,
    pub mean_price: f64,
}

/// Trailing same-sign delta run. At most one side is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionStreak {
    pub increases: usize,
    pub decreases: usize,
}

/// Walk the most recent deltas (within the last `STREAK_WINDOW` prices)
/// from newest to oldest, counting the run of same-sign changes that ends
/// at the latest price.
pub fn direction_streak(prices: &[f64]) -> DirectionStreak {
    let window = &prices[prices.len().saturating_sub(STREAK_WINDOW)..];
    let mut streak = DirectionStreak::default();

    for pair in window.windows(2).rev() {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            if streak.decreases > 0 {
                break;
            }
            streak.increases += 1;
        } else if change < 0.0 {
            if streak.increases > 0 {
                break;
            }
            streak.decreases += 1;
        } else {
            break;
        }
    }

    streak
}

/// Strictly beyond the threshold: |z| == 2 is not an outlier.
pub fn is_outlier(z_score: f64) -> bool {
    z_score.abs() > OUTLIER_Z_THRESHOLD
}

/// Detect anomalies over a price history (oldest-first).
pub fn detect_anomalies(prices: &[f64]) -> Result<AnomalyReport, AnalysisError> {
    AnalysisError::require(prices.len(), ANOMALY_MIN_POINTS)?;

    let current_price = prices[prices.len() - 1];
    let mean_price = mean(prices);
    let std_price = population_std(prices);
    let z_score = if std_price == 0.0 {
        0.0
    } else {
        (current_price - mean_price) / std_price
    };

    let mut anomalies = Vec::new();

    if is_outlier(z_score) {
        anomalies.push(Anomaly::PriceOutlier {
            z_score,
            description: format!(
                "Price is {:.2} standard deviations from mean",
                z_score.abs()
            ),
        });
    }

    let streak = direction_streak(prices);
    if streak.increases >= STREAK_MIN_RUN {
        anomalies.push(Anomaly::ExtendedUptrend {
            streak_length: streak.increases,
            description: format!(
                "Price increased for {} consecutive periods",
                streak.increases
            ),
        });
    } else if streak.decreases >= STREAK_MIN_RUN {
        anomalies.push(Anomaly::ExtendedDowntrend {
            streak_length: streak.decreases,
            description: format!(
                "Price decreased for {} consecutive periods",
                streak.decreases
            ),
        });
    }

    Ok(AnomalyReport {
        anomalies,
        z_score,
        current_price,
        mean_price,
    })
}
