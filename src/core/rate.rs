use super::types::{RatePrediction, RiskTolerance};

/// Reference (age, expected return %) pairs the trend is fitted to.
const REFERENCE_RETURNS: [(f64, f64); 5] =
    [(25.0, 7.0), (35.0, 5.0), (45.0, 3.0), (55.0, 2.0), (65.0, 1.0)];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateEstimator {
    slope: f64,
    intercept: f64,
}

impl RateEstimator {
    pub fn fitted() -> Self {
        let (slope, intercept) = least_squares_fit(&REFERENCE_RETURNS);
        Self { slope, intercept }
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Predicted annual return in percent. Ages outside the reference range
    /// extrapolate along the fitted line and the result is never clamped.
    pub fn estimate(&self, age: u32, risk: RiskTolerance) -> f64 {
        let trend = self.intercept + self.slope * f64::from(age);
        let rate = trend + risk_adjustment(risk);
        tracing::debug!(age, risk = risk.as_str(), rate, "estimated annual return");
        rate
    }

    pub fn predict(&self, age: u32, risk: RiskTolerance) -> RatePrediction {
        RatePrediction {
            annual_return_rate_percent: self.estimate(age, risk),
        }
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        Self::fitted()
    }
}

fn risk_adjustment(risk: RiskTolerance) -> f64 {
    match risk {
        RiskTolerance::Low => -1.0,
        RiskTolerance::Medium => 0.0,
        RiskTolerance::High => 1.0,
    }
}

fn least_squares_fit(points: &[(f64, f64)]) -> (f64, f64) {
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for &(x, y) in points {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x) * (x - mean_x);
    }

    let slope = sxy / sxx;
    (slope, mean_y - slope * mean_x)
}
