//! Date helpers for the text-encoded `date` column.
//!
//! Dates are stored as zero-padded ISO-8601 strings (`YYYY-MM-DD`), so range
//! filters compare them as text. Only the one-year lookback needs calendar
//! arithmetic.

use chrono::{Duration, NaiveDate};

use crate::error::{ClimateError, Result};

/// Storage format of the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the lookback window used by the temperature observations query.
pub const LOOKBACK_DAYS: i64 = 365;

/// Parse a stored date string.
///
/// # Errors
///
/// Returns [`ClimateError::InvalidDate`] if `value` is not `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ClimateError::InvalidDate {
        value: value.to_string(),
    })
}

/// Return the date exactly [`LOOKBACK_DAYS`] calendar days before `latest`.
///
/// # Examples
///
/// ```
/// use surfsup::dates::one_year_before;
///
/// assert_eq!(one_year_before("2017-08-23").unwrap(), "2016-08-23");
/// ```
pub fn one_year_before(latest: &str) -> Result<String> {
    let cutoff = parse_date(latest)? - Duration::days(LOOKBACK_DAYS);
    Ok(cutoff.format(DATE_FORMAT).to_string())
}
