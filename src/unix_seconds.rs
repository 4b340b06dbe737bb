//! Unix timestamp type for the time source and the local-time converter.

use defmt::Format;
use time::OffsetDateTime;

use crate::local_time::UtcSample;

/// Units-safe wrapper for Unix timestamps (seconds since 1970-01-01 00:00:00 UTC)
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Format)]
pub struct UnixSeconds(pub i64);

impl UnixSeconds {
    /// Get the underlying i64 value
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Convert NTP seconds (since 1900-01-01) to Unix seconds (since 1970-01-01)
    #[must_use]
    pub const fn from_ntp_seconds(ntp: u32) -> Option<Self> {
        // 70 years, 17 of them leap years
        const NTP_TO_UNIX_SECONDS: i64 = 2_208_988_800;
        #[expect(
            clippy::arithmetic_side_effects,
            reason = "u32 promoted to i64 cannot overflow"
        )]
        let s = (ntp as i64) - NTP_TO_UNIX_SECONDS;
        // Reject negative (pre-1970)
        if s >= 0 { Some(Self(s)) } else { None }
    }

    /// Break the timestamp into UTC calendar fields.
    ///
    /// Returns `None` if the timestamp is outside the range the `time` crate supports.
    #[must_use]
    pub fn to_utc_sample(self) -> Option<UtcSample> {
        let dt = OffsetDateTime::from_unix_timestamp(self.as_i64()).ok()?;
        Some(UtcSample {
            year: dt.year(),
            month: u8::from(dt.month()),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            weekday: dt.weekday().number_days_from_monday(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::UnixSeconds;

    #[test]
    fn ntp_epoch_offset() {
        assert_eq!(
            UnixSeconds::from_ntp_seconds(2_208_988_800),
            Some(UnixSeconds(0))
        );
        assert_eq!(UnixSeconds::from_ntp_seconds(1_000), None);
    }

    #[test]
    fn utc_sample_fields() {
        // 2024-03-19 13:45:30 UTC, a Tuesday
        let sample = UnixSeconds(1_710_855_930).to_utc_sample().expect("in range");
        assert_eq!(
            (sample.year, sample.month, sample.day),
            (2024, 3, 19)
        );
        assert_eq!((sample.hour, sample.minute, sample.second), (13, 45, 30));
        assert_eq!(sample.weekday, 1);
    }
}
