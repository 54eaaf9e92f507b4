//! Market data access port trait.

use crate::domain::error::TradeBossError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars for `instrument` in ascending date order. Either bound may be
    /// omitted; both are inclusive.
    fn fetch_ohlcv(
        &self,
        instrument: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, TradeBossError>;

    fn list_instruments(&self) -> Result<Vec<String>, TradeBossError>;
}
