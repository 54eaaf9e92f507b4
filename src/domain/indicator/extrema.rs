//! Rolling minimum and maximum, used for support and resistance levels.

use crate::domain::indicator::{RollingSeries, RollingType};

pub fn rolling_min(values: &[f64], window: usize) -> RollingSeries {
    RollingSeries::from_windows(RollingType::Min(window), values, |w| {
        w.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

pub fn rolling_max(values: &[f64], window: usize) -> RollingSeries {
    RollingSeries::from_windows(RollingType::Max(window), values, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}
