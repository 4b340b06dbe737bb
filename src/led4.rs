//! A device abstraction for a multiplexed 4-digit, 7-segment LED display.
//!
//! Only one digit is lit at a time. The driver visits positions 3, 2, 1, 0, and
//! for each one turns every digit-enable line off, drives the segment lines,
//! enables that position for [`MULTIPLEX_SLEEP_US`], then disables it again.
//! Persistence of vision makes all four digits appear lit together.
//!
//! The displayed value comes from a [`DaysCell`], read once at the start of each
//! full cycle, so an update shows up within one cycle and never mid-digit.
//!
//! See [`Led4`] for the device (Pico only) and [`Led4Driver`] for the hardware-free
//! render loop it runs.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::bit_matrix_led4::{BitMatrixLed4, CELL_COUNT, SEGMENT_COUNT, SegmentPattern};
use crate::error::Error::IndexOutOfBounds;
use crate::output_array::{OutputArray, Polarity};
use crate::{DaysCell, Result};

// ============================================================================
// Constants
// ============================================================================

/// How long each digit stays enabled per cycle, in microseconds.
pub const MULTIPLEX_SLEEP_US: u32 = 3_000;

/// Order in which digit positions are visited within one cycle.
pub const SCAN_ORDER: [usize; CELL_COUNT] = [3, 2, 1, 0];

/// Dwell requested by one full cycle, in microseconds.
#[expect(clippy::cast_possible_truncation, reason = "4 fits in u32")]
pub const CYCLE_US: u32 = MULTIPLEX_SLEEP_US * CELL_COUNT as u32;

// ============================================================================
// HardwareContext
// ============================================================================

/// The display's output lines and their polarity.
///
/// Built once at startup and owned by the display driver for the rest of the
/// program. `cells[0]` enables the most significant digit; `segments` are wired
/// A, B, C, D, E, F, G, DP.
pub struct HardwareContext<P> {
    cells: OutputArray<P, CELL_COUNT>,
    segments: OutputArray<P, SEGMENT_COUNT>,
    cell_polarity: Polarity,
    segment_polarity: Polarity,
}

impl<P: OutputPin> HardwareContext<P> {
    pub const fn new(
        cells: OutputArray<P, CELL_COUNT>,
        segments: OutputArray<P, SEGMENT_COUNT>,
        cell_polarity: Polarity,
        segment_polarity: Polarity,
    ) -> Self {
        Self {
            cells,
            segments,
            cell_polarity,
            segment_polarity,
        }
    }

    /// Disable every digit.
    ///
    /// # Errors
    ///
    /// Returns an error if any enable line rejects the write.
    pub fn cells_off(&mut self) -> Result<()> {
        self.cells.set_all(self.cell_polarity.state(false))
    }

    /// Light only `position` with `pattern` and leave it on, for checking the wiring.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is not a digit or a line rejects the write.
    pub fn show_single(&mut self, position: usize, pattern: SegmentPattern) -> Result<()> {
        if position >= CELL_COUNT {
            return Err(IndexOutOfBounds);
        }
        self.cells_off()?;
        self.segments.set_from_pattern(pattern, self.segment_polarity)?;
        self.set_cell(position, true)
    }

    fn set_cell(&mut self, position: usize, on: bool) -> Result<()> {
        self.cells
            .set_state_at_index(position, self.cell_polarity.state(on))
    }
}

/// Render one full cycle of `bit_matrix`.
///
/// # Errors
///
/// Returns an error if an output line rejects a write. The cycle stops there.
pub async fn render_cycle<P: OutputPin, D: DelayNs>(
    hardware: &mut HardwareContext<P>,
    delay: &mut D,
    bit_matrix: &BitMatrixLed4,
) -> Result<()> {
    for position in SCAN_ORDER {
        let pattern = bit_matrix.get(position).ok_or(IndexOutOfBounds)?;
        hardware.cells_off()?;
        hardware
            .segments
            .set_from_pattern(pattern, hardware.segment_polarity)?;
        hardware.set_cell(position, true)?;
        delay.delay_us(MULTIPLEX_SLEEP_US).await;
        hardware.set_cell(position, false)?;
    }
    Ok(())
}

// ============================================================================
// Led4Driver
// ============================================================================

/// The render loop, independent of the executor and the board.
pub struct Led4Driver<'a, P, D> {
    hardware: HardwareContext<P>,
    delay: D,
    days: &'a DaysCell,
}

impl<'a, P: OutputPin, D: DelayNs> Led4Driver<'a, P, D> {
    pub const fn new(hardware: HardwareContext<P>, delay: D, days: &'a DaysCell) -> Self {
        Self {
            hardware,
            delay,
            days,
        }
    }

    /// Render one full cycle of the current day count.
    ///
    /// On failure every digit is switched off and the dwell is still waited out, so
    /// a faulty line can neither ghost nor starve other tasks.
    ///
    /// # Errors
    ///
    /// Returns the output error that cut the cycle short.
    pub async fn refresh(&mut self) -> Result<()> {
        let bit_matrix = BitMatrixLed4::from_days(self.days.get());
        let result = render_cycle(&mut self.hardware, &mut self.delay, &bit_matrix).await;
        if result.is_err() {
            // Best effort; the first error is the one reported.
            let _ = self.hardware.cells_off();
            self.delay.delay_us(MULTIPLEX_SLEEP_US).await;
        }
        result
    }
}

// ============================================================================
// Led4 Virtual Device
// ============================================================================

#[cfg(feature = "pico1")]
mod device {
    use defmt::warn;
    use embassy_executor::{SpawnError, Spawner};
    use embassy_rp::gpio::Output;
    use embassy_time::Delay;

    use super::{HardwareContext, Led4Driver};
    use crate::DaysCell;

    /// Static resources for the [`Led4`] device.
    pub struct Led4Static {
        days: DaysCell,
    }

    /// A device abstraction for the multiplexed display; owns a background task.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # #![no_std]
    /// # #![no_main]
    /// # use panic_probe as _;
    /// use days_since::hardware::Hardware;
    /// use days_since::led4::{Led4, Led4Static};
    ///
    /// async fn example(spawner: embassy_executor::Spawner) -> days_since::Result<()> {
    ///     let hardware = Hardware::default();
    ///     static LED4_STATIC: Led4Static = Led4::new_static();
    ///     let led4 = Led4::new(&LED4_STATIC, hardware.display, spawner)?;
    ///
    ///     // Shows "0042" from the next cycle on
    ///     led4.days_cell().set(42);
    ///     Ok(())
    /// }
    /// ```
    pub struct Led4<'a>(&'a DaysCell);

    impl<'a> Led4<'a> {
        /// Creates static resources for the display.
        #[must_use]
        pub const fn new_static() -> Led4Static {
            Led4Static {
                days: DaysCell::new(0),
            }
        }

        /// Creates the display device and spawns its background task.
        ///
        /// # Errors
        ///
        /// Returns an error if the task cannot be spawned.
        #[must_use = "Must be used to manage the spawned task"]
        pub fn new(
            led4_static: &'static Led4Static,
            hardware: HardwareContext<Output<'static>>,
            spawner: Spawner,
        ) -> Result<Led4<'static>, SpawnError> {
            let driver = Led4Driver::new(hardware, Delay, &led4_static.days);
            let token = device_loop(driver)?;
            spawner.spawn(token);
            Ok(Led4(&led4_static.days))
        }

        /// The cell the display reads from; hand it to the refresh task.
        #[must_use]
        pub const fn days_cell(&self) -> &'a DaysCell {
            self.0
        }
    }

    #[embassy_executor::task]
    async fn device_loop(mut driver: Led4Driver<'static, Output<'static>, Delay>) -> ! {
        loop {
            if let Err(err) = driver.refresh().await {
                warn!("display cycle failed: {}", err);
            }
        }
    }
}

#[cfg(feature = "pico1")]
pub use device::{Led4, Led4Static};
