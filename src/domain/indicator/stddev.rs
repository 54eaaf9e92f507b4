//! Rolling standard deviation.
//!
//! Sample standard deviation over n values (n - 1 denominator).
//! STDDEV(n)[i] = sqrt(sum((X[i-j] - MEAN(n)[i])^2 for j in 0..n-1) / (n - 1))
//! Warmup: first (n-1) points are invalid. A window of 1 has no spread and is
//! never valid.

use crate::domain::indicator::{RollingPoint, RollingSeries, RollingType};
use crate::domain::stats;

pub fn rolling_stddev(values: &[f64], window: usize) -> RollingSeries {
    let mut series =
        RollingSeries::from_windows(RollingType::Stddev(window), values, |w| {
            stats::sample_stddev(w).unwrap_or(0.0)
        });

    if window < 2 {
        for point in series.values.iter_mut() {
            *point = RollingPoint {
                valid: false,
                value: 0.0,
            };
        }
    }

    series
}
