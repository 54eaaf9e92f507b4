//! Rolling arithmetic mean.
//!
//! MEAN(n)[i] = sum(X[i-j] for j in 0..n-1) / n
//! Warmup: first (n-1) points are invalid.

use crate::domain::indicator::{RollingSeries, RollingType};
use crate::domain::stats;

pub fn rolling_mean(values: &[f64], window: usize) -> RollingSeries {
    RollingSeries::from_windows(RollingType::Mean(window), values, stats::mean)
}
