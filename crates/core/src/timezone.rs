//! Timezone handling utilities
//!
//! Event dates and times are local to the server's configured timezone.
//! This module resolves that zone and derives "today" from it.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{CalendarError, CalendarResult};

/// Timezone used when `APP_TIMEZONE` is not set
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";

/// Parse an IANA timezone string (e.g., "America/Sao_Paulo", "Europe/Lisbon")
///
/// # Examples
///
/// ```
/// use whatsfest_core::timezone::parse_timezone;
///
/// let tz = parse_timezone("America/Recife").unwrap();
/// assert_eq!(tz.name(), "America/Recife");
/// ```
pub fn parse_timezone(tz_str: &str) -> CalendarResult<Tz> {
    tz_str
        .parse::<Tz>()
        .map_err(|_| CalendarError::InvalidTimezone(tz_str.to_string()))
}

/// Validate that a timezone string is valid
pub fn validate_timezone(tz_str: &str) -> CalendarResult<()> {
    parse_timezone(tz_str)?;
    Ok(())
}

/// Server default timezone
pub fn default_timezone() -> Tz {
    Tz::America__Sao_Paulo
}

/// Calendar date of an instant as seen in `tz`
pub fn local_date(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Today's date in `tz`; the production source of the grid's "today"
pub fn today_in(tz: &Tz) -> NaiveDate {
    local_date(&Utc::now(), tz)
}
