//! Configuration validation.
//!
//! Validates every configured field before a boss is built. Missing keys are
//! fine (defaults apply); present keys must be in range.

use crate::domain::agent::DETERMINISTIC_AGENTS;
use crate::domain::error::TradeBossError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_boss_config(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    validate_windows(config)?;
    validate_momentum_order(config)?;
    validate_value_bands(config)?;
    validate_volatility_ceiling(config)?;
    validate_weights(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    validate_dates(config)
}

pub fn validate_verification_config(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    validate_horizon(config)?;
    validate_neutral_band(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> TradeBossError {
    TradeBossError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// A present key that does not parse as a finite number is an error; an
/// absent key is `None`.
fn present_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, TradeBossError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| invalid(section, key, "must be a finite number")),
    }
}

fn present_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<i64>, TradeBossError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(section, key, "must be an integer")),
    }
}

const POSITIVE_INT_KEYS: [(&str, &str); 7] = [
    ("swing", "lookback_period"),
    ("swing", "support_resistance_window"),
    ("momentum", "short_window"),
    ("momentum", "long_window"),
    ("value", "valuation_window"),
    ("quant", "feature_window"),
    ("external", "required_bars"),
];

fn validate_windows(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    for (section, key) in POSITIVE_INT_KEYS {
        if present_int(config, section, key)?.is_some_and(|v| v <= 0) {
            return Err(invalid(section, key, "must be a positive integer"));
        }
    }
    Ok(())
}

fn validate_momentum_order(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    let short = present_int(config, "momentum", "short_window")?.unwrap_or(10);
    let long = present_int(config, "momentum", "long_window")?.unwrap_or(30);
    if short >= long {
        return Err(invalid(
            "momentum",
            "short_window",
            "short_window must be less than long_window",
        ));
    }
    Ok(())
}

fn validate_value_bands(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    if let Some(discount) = present_double(config, "value", "buy_discount")? {
        if discount <= 0.0 || discount >= 1.0 {
            return Err(invalid(
                "value",
                "buy_discount",
                "buy_discount must be between 0 and 1",
            ));
        }
    }
    if let Some(premium) = present_double(config, "value", "sell_premium")? {
        if premium <= 1.0 {
            return Err(invalid(
                "value",
                "sell_premium",
                "sell_premium must be greater than 1",
            ));
        }
    }
    Ok(())
}

fn validate_volatility_ceiling(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    if present_double(config, "quant", "volatility_ceiling")?.is_some_and(|v| v <= 0.0) {
        return Err(invalid(
            "quant",
            "volatility_ceiling",
            "volatility_ceiling must be positive",
        ));
    }
    Ok(())
}

fn validate_weights(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    let keys = DETERMINISTIC_AGENTS
        .iter()
        .map(|name| ("weights", *name))
        .chain([("external", "weight")]);
    for (section, key) in keys {
        if present_double(config, section, key)?.is_some_and(|v| v < 0.0) {
            return Err(invalid(section, key, "weight must be non-negative"));
        }
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid(
                "data",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

pub fn parse_optional_date(
    config: &dyn ConfigPort,
    field: &str,
) -> Result<Option<NaiveDate>, TradeBossError> {
    match config.get_string("data", field) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "data",
                    field,
                    &format!("invalid {} format, expected YYYY-MM-DD", field),
                )
            }),
    }
}

fn validate_horizon(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    if present_int(config, "verification", "horizon_days")?.is_some_and(|v| v <= 0) {
        return Err(invalid(
            "verification",
            "horizon_days",
            "horizon_days must be a positive integer",
        ));
    }
    Ok(())
}

fn validate_neutral_band(config: &dyn ConfigPort) -> Result<(), TradeBossError> {
    if present_double(config, "verification", "neutral_band_pct")?.is_some_and(|v| v < 0.0) {
        return Err(invalid(
            "verification",
            "neutral_band_pct",
            "neutral_band_pct must be non-negative",
        ));
    }
    Ok(())
}
