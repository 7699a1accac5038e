//! Helpers for working with the configured local timezone.

use time::{Duration, OffsetDateTime, UtcOffset};
use time_tz::{Offset, OffsetDateTimeExt, PrimitiveDateTimeExt, TimeZone};

use crate::Error;

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if `canonical_timezone` is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Get midnight at the start of the day that `now` falls on in `canonical_timezone`.
///
/// The offset is resolved for midnight itself, so days where daylight saving
/// starts or ends still begin at local midnight. If the clocks skip midnight
/// the day starts at the transition, and if midnight happens twice the
/// earlier one is used.
///
/// The returned date-time is converted back to UTC so that it can be compared
/// against the UTC timestamps stored in the database.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a known timezone.
pub fn local_midnight(
    now: OffsetDateTime,
    canonical_timezone: &str,
) -> Result<OffsetDateTime, Error> {
    let timezone = time_tz::timezones::get_by_name(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))?;

    let midnight = now.to_timezone(timezone).date().midnight();
    let start_of_day = midnight.assume_timezone(timezone).take_first().unwrap_or_else(|| {
        // Midnight was skipped, so use the offset from before the transition.
        let previous_offset = timezone.get_offset_utc(&(now - Duration::DAY)).to_utc();
        midnight.assume_offset(previous_offset)
    });

    Ok(start_of_day.to_offset(UtcOffset::UTC))
}
