//! Whole days between a reference date and the local date.

use time::Date;

use crate::Result;
use crate::local_time::{LocalTime, calendar_date};

/// A calendar date that day counts are measured from.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ReferenceDate(Date);

impl ReferenceDate {
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidTimestamp`] if the fields do not name a real day.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        calendar_date(year, month, day).map(Self)
    }

    #[must_use]
    pub const fn date(self) -> Date {
        self.0
    }

    /// Days from this reference date until `local`'s date, ignoring time of day.
    ///
    /// Negative when the reference date lies in the future.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidTimestamp`] if `local` does not name a real day.
    pub fn days_until(self, local: &LocalTime) -> Result<i32> {
        Ok(days_between(self.0, local.date()?))
    }
}

/// Signed whole-day difference `to - from`, via Julian day numbers.
#[must_use]
pub const fn days_between(from: Date, to: Date) -> i32 {
    to.to_julian_day().saturating_sub(from.to_julian_day())
}

/// Days elapsed since `ref_year-ref_month-ref_day` on the date of `local`.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidTimestamp`] if either date is not a real day.
pub fn days_since(ref_year: i32, ref_month: u8, ref_day: u8, local: &LocalTime) -> Result<i32> {
    ReferenceDate::new(ref_year, ref_month, ref_day)?.days_until(local)
}
