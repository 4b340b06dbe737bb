use embassy_rp::gpio::{Level, Output};
use embedded_hal::digital::PinState;

use crate::led4::HardwareContext;
use crate::output_array::{OutputArray, Polarity};

/// Digit enables drive the common cathodes through 330R resistors: high lights a digit.
pub const CELL_POLARITY: Polarity = Polarity::ActiveHigh;

/// Segment lines sink current: low lights a segment.
pub const SEGMENT_POLARITY: Polarity = Polarity::ActiveLow;

/// Board resources, split by the device that owns them.
///
/// | Line            | GPIO        |
/// |-----------------|-------------|
/// | digit 0..3      | GP1..GP4    |
/// | segment A..G,DP | GP5..GP12   |
pub struct Hardware {
    pub display: HardwareContext<Output<'static>>,
    #[cfg(feature = "wifi")]
    pub wifi: crate::wifi::WifiPeripherals,
}

impl Default for Hardware {
    fn default() -> Self {
        let peripherals: embassy_rp::Peripherals =
            embassy_rp::init(embassy_rp::config::Config::default());

        let cell_off = off_level(CELL_POLARITY);
        let cells = OutputArray::new([
            Output::new(peripherals.PIN_1, cell_off),
            Output::new(peripherals.PIN_2, cell_off),
            Output::new(peripherals.PIN_3, cell_off),
            Output::new(peripherals.PIN_4, cell_off),
        ]);

        let segment_off = off_level(SEGMENT_POLARITY);
        let segments = OutputArray::new([
            Output::new(peripherals.PIN_5, segment_off),
            Output::new(peripherals.PIN_6, segment_off),
            Output::new(peripherals.PIN_7, segment_off),
            Output::new(peripherals.PIN_8, segment_off),
            Output::new(peripherals.PIN_9, segment_off),
            Output::new(peripherals.PIN_10, segment_off),
            Output::new(peripherals.PIN_11, segment_off),
            Output::new(peripherals.PIN_12, segment_off),
        ]);

        Self {
            display: HardwareContext::new(cells, segments, CELL_POLARITY, SEGMENT_POLARITY),
            #[cfg(feature = "wifi")]
            wifi: crate::wifi::WifiPeripherals {
                pin_23: peripherals.PIN_23,
                pin_25: peripherals.PIN_25,
                pio0: peripherals.PIO0,
                pin_24: peripherals.PIN_24,
                pin_29: peripherals.PIN_29,
                dma_ch0: peripherals.DMA_CH0,
            },
        }
    }
}

const fn off_level(polarity: Polarity) -> Level {
    match polarity.state(false) {
        PinState::High => Level::High,
        PinState::Low => Level::Low,
    }
}
