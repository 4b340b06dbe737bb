//! Once-a-minute refresh of the day count.
//!
//! [`Scheduler`] decides when a refresh is due and runs one: fetch UTC, convert
//! to Eastern time, count days since the reference date, publish to the
//! [`DaysCell`]. It takes the current time as a plain number of seconds so it
//! runs the same on the board and in host tests.

use defmt::Format;

use crate::elapsed_days::ReferenceDate;
use crate::error::Error::InvalidTimestamp;
use crate::local_time::to_local;
use crate::time_sync::TimeSource;
use crate::{DaysCell, Result, UnixSeconds};

/// Minimum seconds between two refresh attempts.
pub const REFRESH_INTERVAL_SECS: u64 = 60;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Format)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// Tracks when the day count was last refreshed.
#[derive(Debug)]
pub struct Scheduler {
    reference: ReferenceDate,
    interval_secs: u64,
    last_attempt_secs: Option<u64>,
    state: RefreshState,
}

impl Scheduler {
    /// A scheduler whose first refresh is due immediately.
    #[must_use]
    pub const fn new(reference: ReferenceDate) -> Self {
        Self {
            reference,
            interval_secs: REFRESH_INTERVAL_SECS,
            last_attempt_secs: None,
            state: RefreshState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> RefreshState {
        self.state
    }

    /// True once `interval_secs` have passed since the last attempt, or if there
    /// has been none.
    #[must_use]
    pub const fn is_due(&self, now_secs: u64) -> bool {
        match self.last_attempt_secs {
            None => true,
            Some(last) => now_secs.saturating_sub(last) >= self.interval_secs,
        }
    }

    /// Seconds to sleep before the next refresh is due; zero if already due.
    #[must_use]
    pub const fn secs_until_due(&self, now_secs: u64) -> u64 {
        match self.last_attempt_secs {
            None => 0,
            Some(last) => self
                .interval_secs
                .saturating_sub(now_secs.saturating_sub(last)),
        }
    }

    /// Refresh if due. Returns `None` when it is not yet time.
    pub async fn poll(
        &mut self,
        now_secs: u64,
        source: &mut impl TimeSource,
        days: &DaysCell,
    ) -> Option<Result<i32>> {
        if self.is_due(now_secs) {
            Some(self.refresh(now_secs, source, days).await)
        } else {
            None
        }
    }

    /// Fetch the time and publish a new day count.
    ///
    /// The attempt is recorded whether or not it succeeds, so a failing source
    /// is retried one interval later rather than in a tight loop.
    ///
    /// # Errors
    ///
    /// Returns the time source's error, or [`crate::Error::InvalidTimestamp`] when
    /// the reported time cannot be placed on the calendar. `days` is left
    /// untouched in either case.
    pub async fn refresh(
        &mut self,
        now_secs: u64,
        source: &mut impl TimeSource,
        days: &DaysCell,
    ) -> Result<i32> {
        self.begin(now_secs);
        let fetched = source.fetch_utc().await;
        self.finish(fetched, days)
    }

    /// Idle → Refreshing. Records `now_secs` as the latest attempt.
    pub const fn begin(&mut self, now_secs: u64) {
        self.state = RefreshState::Refreshing;
        self.last_attempt_secs = Some(now_secs);
    }

    /// Refreshing → Idle. Publishes the count computed from `fetched`, if any.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or [`crate::Error::InvalidTimestamp`]. `days` is
    /// left untouched in either case.
    pub fn finish(&mut self, fetched: Result<UnixSeconds>, days: &DaysCell) -> Result<i32> {
        let result = fetched.and_then(|unix_seconds| self.count_days(unix_seconds));
        if let Ok(count) = result {
            days.set(count);
        }
        self.state = RefreshState::Idle;
        result
    }

    fn count_days(&self, unix_seconds: UnixSeconds) -> Result<i32> {
        let utc = unix_seconds.to_utc_sample().ok_or(InvalidTimestamp)?;
        let local = to_local(&utc)?;
        self.reference.days_until(&local)
    }
}

// ============================================================================
// Refresh task
// ============================================================================

#[cfg(feature = "pico1")]
mod device {
    use defmt::{info, warn};
    use embassy_executor::{SpawnError, Spawner};
    use embassy_time::{Instant, Timer};

    use super::Scheduler;
    use crate::DaysCell;
    use crate::led4::Led4;

    #[cfg(all(feature = "wifi", feature = "pico1"))]
    pub type FirmwareTimeSource = crate::time_sync::NtpTimeSource;
    #[cfg(not(feature = "wifi"))]
    pub type FirmwareTimeSource = crate::time_sync::Unavailable;

    /// Spawn the task that keeps `led4` showing the current day count.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be spawned.
    pub fn spawn_refresh(
        scheduler: Scheduler,
        source: FirmwareTimeSource,
        led4: &Led4<'static>,
        spawner: Spawner,
    ) -> Result<(), SpawnError> {
        let token = refresh_loop(scheduler, source, led4.days_cell())?;
        spawner.spawn(token);
        Ok(())
    }

    #[embassy_executor::task]
    async fn refresh_loop(
        mut scheduler: Scheduler,
        mut source: FirmwareTimeSource,
        days: &'static DaysCell,
    ) -> ! {
        info!("Refresh task started");
        loop {
            let now_secs = Instant::now().as_secs();
            match scheduler.poll(now_secs, &mut source, days).await {
                Some(Ok(count)) => info!("Days since reference date: {}", count),
                Some(Err(err)) => warn!("Refresh failed, keeping {}: {}", days.get(), err),
                None => {}
            }
            let wait_secs = scheduler.secs_until_due(Instant::now().as_secs());
            Timer::after_secs(wait_secs.max(1)).await;
        }
    }
}

#[cfg(feature = "pico1")]
pub use device::{FirmwareTimeSource, spawn_refresh};
