//! The day count shared by the refresh task (writer) and the display task (reader).

use core::sync::atomic::{AtomicI32, Ordering};

/// Single-writer, multi-reader cell holding the current day count.
///
/// The value is replaced whole with one store, so readers see either the old or
/// the new count and never a mix. Only `load`/`store` are used, which the RP2040
/// supports without compare-and-swap.
pub struct DaysCell(AtomicI32);

impl DaysCell {
    /// Create a cell holding `initial`.
    #[must_use]
    pub const fn new(initial: i32) -> Self {
        Self(AtomicI32::new(initial))
    }

    #[must_use]
    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, days: i32) {
        self.0.store(days, Ordering::Release);
    }
}

impl Default for DaysCell {
    fn default() -> Self {
        Self::new(0)
    }
}
