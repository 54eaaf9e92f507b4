//! Rolling-window statistics.
//!
//! This module provides types for representing rolling values over a numeric
//! projection of a series (closes, highs, daily returns, ...):
//! - `RollingPoint`: a single point, flagged invalid during warmup
//! - `RollingType`: statistic identity + window
//! - `RollingSeries`: the full rolling output, aligned with its input
//!
//! Agents only consult the last point, so `RollingSeries::last_valid` is the
//! usual entry point.

pub mod extrema;
pub mod sma;
pub mod stddev;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingPoint {
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingType {
    Mean(usize),
    Stddev(usize),
    Min(usize),
    Max(usize),
}

impl RollingType {
    pub fn window(&self) -> usize {
        match self {
            RollingType::Mean(w)
            | RollingType::Stddev(w)
            | RollingType::Min(w)
            | RollingType::Max(w) => *w,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RollingSeries {
    pub rolling_type: RollingType,
    pub values: Vec<RollingPoint>,
}

impl RollingSeries {
    /// Value at the final index, or `None` if the input was shorter than the
    /// window.
    pub fn last_valid(&self) -> Option<f64> {
        self.values
            .last()
            .filter(|p| p.valid)
            .map(|p| p.value)
    }

    /// Applies `f` to every full window of `input`; earlier indices are
    /// marked invalid.
    pub(crate) fn from_windows<F>(rolling_type: RollingType, input: &[f64], f: F) -> Self
    where
        F: Fn(&[f64]) -> f64,
    {
        let window = rolling_type.window();
        let warmup = window.saturating_sub(1);
        let values = (0..input.len())
            .map(|i| {
                if window > 0 && i >= warmup {
                    RollingPoint {
                        valid: true,
                        value: f(&input[i + 1 - window..=i]),
                    }
                } else {
                    RollingPoint {
                        valid: false,
                        value: 0.0,
                    }
                }
            })
            .collect();

        Self {
            rolling_type,
            values,
        }
    }
}
