use embedded_hal::digital::{OutputPin, PinState};

use crate::bit_matrix_led4::{SEGMENT_COUNT, SegmentPattern};
use crate::error::Error::{CannotSetOutputState, IndexOutOfBounds};
use crate::Result;

/// Which electrical level turns a line on.
#[derive(Copy, Clone, Debug, Eq, PartialEq, defmt::Format)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// The pin state that makes a line `on` (or off).
    #[must_use]
    pub const fn state(self, on: bool) -> PinState {
        match (self, on) {
            (Self::ActiveHigh, true) | (Self::ActiveLow, false) => PinState::High,
            (Self::ActiveHigh, false) | (Self::ActiveLow, true) => PinState::Low,
        }
    }
}

/// Array of GPIO output pins for LED displays.
pub struct OutputArray<P, const N: usize>([P; N]);

impl<P: OutputPin, const N: usize> OutputArray<P, N> {
    pub const fn new(outputs: [P; N]) -> Self {
        Self(outputs)
    }

    /// # Errors
    ///
    /// Returns an error if `index` is out of range or the pin rejects the write.
    #[inline]
    pub fn set_state_at_index(&mut self, index: usize, state: PinState) -> Result<()> {
        self.0
            .get_mut(index)
            .ok_or(IndexOutOfBounds)?
            .set_state(state)
            .map_err(|_| CannotSetOutputState)
    }

    /// # Errors
    ///
    /// Returns an error if any pin rejects the write. Later pins are still written.
    #[inline]
    pub fn set_all(&mut self, state: PinState) -> Result<()> {
        let mut result = Ok(());
        for output in &mut self.0 {
            if output.set_state(state).is_err() {
                result = Err(CannotSetOutputState);
            }
        }
        result
    }
}

impl<P: OutputPin> OutputArray<P, SEGMENT_COUNT> {
    /// Drive segment lines A..DP from `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin rejects the write.
    #[inline]
    pub fn set_from_pattern(&mut self, pattern: SegmentPattern, polarity: Polarity) -> Result<()> {
        for (output, on) in self.0.iter_mut().zip(pattern.flags()) {
            output
                .set_state(polarity.state(on))
                .map_err(|_| CannotSetOutputState)?;
        }
        Ok(())
    }
}
