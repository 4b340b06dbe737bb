//! UTC to US Eastern local time.

use defmt::Format;
use time::{Date, Month};

use crate::dst::is_dst;
use crate::{Error, Result};

/// Eastern Standard Time, hours from UTC.
pub const STANDARD_OFFSET_HOURS: i8 = -5;

/// Eastern Daylight Time, hours from UTC.
pub const DST_OFFSET_HOURS: i8 = -4;

/// Calendar fields of a UTC instant as reported by the time source.
///
/// `weekday` counts from Monday = 0.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Format)]
pub struct UtcSample {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub weekday: u8,
}

/// Eastern wall-clock time.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Format)]
pub struct LocalTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl UtcSample {
    /// Whole hours to add to this sample to get Eastern time.
    #[must_use]
    pub const fn utc_offset_hours(&self) -> i8 {
        if is_dst(self.year, self.month, self.day, self.weekday) {
            DST_OFFSET_HOURS
        } else {
            STANDARD_OFFSET_HOURS
        }
    }

    fn date(&self) -> Result<Date> {
        calendar_date(self.year, self.month, self.day)
    }
}

impl LocalTime {
    /// The calendar date part, with time of day dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] if the fields do not name a real day.
    pub fn date(&self) -> Result<Date> {
        calendar_date(self.year, self.month, self.day)
    }
}

/// Converts a UTC sample to Eastern time.
///
/// The DST decision is made on the UTC date. When the offset moves the hour past
/// midnight in either direction the date steps to the neighbouring calendar day,
/// so month and year boundaries roll over too.
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] if the sample's date fields are not a real
/// calendar day, or stepping would leave the supported date range.
pub fn to_local(utc: &UtcSample) -> Result<LocalTime> {
    let date = utc.date()?;
    let hour = i16::from(utc.hour).saturating_add(i16::from(utc.utc_offset_hours()));

    let (date, hour) = if hour < 0 {
        let previous = date.previous_day().ok_or(Error::InvalidTimestamp)?;
        (previous, hour.saturating_add(24))
    } else if hour >= 24 {
        let next = date.next_day().ok_or(Error::InvalidTimestamp)?;
        (next, hour.saturating_sub(24))
    } else {
        (date, hour)
    };

    Ok(LocalTime {
        year: date.year(),
        month: u8::from(date.month()),
        day: date.day(),
        hour: u8::try_from(hour).map_err(|_| Error::InvalidTimestamp)?,
        minute: utc.minute,
        second: utc.second,
    })
}

pub(crate) fn calendar_date(year: i32, month: u8, day: u8) -> Result<Date> {
    let month = Month::try_from(month).map_err(|_| Error::InvalidTimestamp)?;
    Date::from_calendar_date(year, month, day).map_err(|_| Error::InvalidTimestamp)
}
